use anyhow::{bail, Context};
use serde::Serialize;
use serde_json::json;

use hb_app::App;
use hb_core::geo::{format_distance, format_member_count};
use hb_core::interests::{find_by_label, CATALOG};
use hb_core::ports::api::DEFAULT_NEARBY_RADIUS_M;
use hb_core::ports::{CommentApiPort, UserApiPort};
use hb_core::preferences::{PreferencesUpdate, SearchPreferences, Theme};
use hb_core::{Comment, Community, CommunityFilter, GeoPoint, NewCommunity, ProfileUpdate, SignUpRequest, User};
use hobbyapp::WiredApp;

use super::{Command, CommentCommand, FavoriteCommand};

fn emit<T: Serialize + ?Sized>(json: bool, value: &T, human: impl FnOnce()) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human();
    }
    Ok(())
}

fn print_user(user: &User) {
    println!("{} <{}> [{}]", user.name, user.email, user.id);
    if let Some(bio) = &user.bio {
        println!("  {bio}");
    }
    if let Some(location) = &user.location {
        println!("  {}", location.city);
    }
    if !user.interests.is_empty() {
        println!("  interests: {}", user.interests.join(", "));
    }
}

fn print_community(community: &Community) {
    let joined = if community.is_joined == Some(true) { "*" } else { " " };
    let distance = community
        .distance
        .map(|d| format!(", {}", format_distance(d)))
        .unwrap_or_default();
    println!(
        "{joined} [{}] {} ({}, {} members{distance})",
        community.id,
        community.title,
        community.category,
        format_member_count(community.member_count),
    );
}

fn print_comment(comment: &Comment) {
    let liked = if comment.is_liked { " (liked)" } else { "" };
    println!(
        "[{}] {} at {}: {} ({} likes{liked})",
        comment.id,
        comment.author_name,
        comment.created_at.format("%Y-%m-%d %H:%M"),
        comment.text,
        comment.likes,
    );
}

fn canonical_interest(label: &str) -> anyhow::Result<String> {
    match find_by_label(label) {
        Some(interest) => Ok(interest.label.to_string()),
        None => {
            let known: Vec<_> = CATALOG.iter().map(|i| i.label).collect();
            bail!("unknown interest `{label}`, expected one of: {}", known.join(", "))
        }
    }
}

fn require_signed_in(app: &App) -> anyhow::Result<User> {
    app.session()
        .user()
        .context("not signed in, run `hobbyapp sign-in` first")
}

/// Origin for distances: explicit, else the cached device location, else
/// the signed-in user's location.
async fn resolve_origin(app: &App, near: Option<(f64, f64)>) -> anyhow::Result<Option<GeoPoint>> {
    if let Some((lat, lon)) = near {
        let point = GeoPoint::new(lat, lon);
        app.preferences().cache_location(point).await?;
        return Ok(Some(point));
    }
    if let Some(point) = app.preferences().cached_location().await? {
        return Ok(Some(point));
    }
    Ok(app.session().user().and_then(|u| u.point()))
}

pub async fn run(command: Command, wired: &WiredApp, json_output: bool) -> anyhow::Result<()> {
    let app = &wired.app;

    match command {
        Command::Status => {
            let state = app.session().state();
            let status = json!({
                "phase": format!("{:?}", state.phase()),
                "apiMode": format!("{:?}", wired.api_mode),
                "storage": format!("{:?}", wired.storage_backend),
                "dataRoot": wired.data_root,
                "user": state.user,
                "interests": state.confirmed_interests(),
            });
            emit(json_output, &status, || {
                println!("phase:     {:?}", state.phase());
                println!("api mode:  {:?}", wired.api_mode);
                println!("storage:   {:?} at {}", wired.storage_backend, wired.data_root.display());
                match &state.user {
                    Some(user) => print_user(user),
                    None => println!("not signed in"),
                }
                if let Some(interests) = state.confirmed_interests() {
                    println!("interests: {}", interests.join(", "));
                }
            })
        }

        Command::SignIn { email, password } => {
            let user = app.auth().sign_in(&email, &password).await?;
            emit(json_output, &user, || {
                println!("signed in as {}", user.name);
                if !app.session().state().is_onboarded {
                    println!("pick your interests with `hobbyapp onboard -i <label>`");
                }
            })
        }

        Command::SignUp {
            name,
            email,
            password,
            interests,
        } => {
            let interests = interests
                .iter()
                .map(|label| canonical_interest(label))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let request = SignUpRequest {
                name,
                email,
                password,
                interests,
            };
            let user = app.auth().sign_up(&request).await?;
            emit(json_output, &user, || println!("welcome, {}", user.name))
        }

        Command::SignOut => {
            app.auth().sign_out().await;
            emit(json_output, &json!({ "signedOut": true }), || {
                println!("signed out")
            })
        }

        Command::RefreshToken => {
            app.auth().refresh_token().await?;
            emit(json_output, &json!({ "refreshed": true }), || {
                println!("token refreshed")
            })
        }

        Command::Onboard { interests } => {
            require_signed_in(app)?;
            let interests = interests
                .iter()
                .map(|label| canonical_interest(label))
                .collect::<anyhow::Result<Vec<_>>>()?;
            app.session().set_interests(interests.clone());
            app.onboarding().execute_with(interests).await?;
            app.preferences().set_onboarding_completed(true).await?;
            let state = app.session().state();
            emit(json_output, &state.interests, || {
                println!("onboarding complete: {}", state.interests.join(", "))
            })
        }

        Command::Interests => {
            let selected = app.session().state().interests;
            let rows: Vec<_> = CATALOG
                .iter()
                .map(|i| json!({ "id": i.id, "label": i.label, "selected": selected.iter().any(|s| s == i.label) }))
                .collect();
            emit(json_output, &rows, || {
                for interest in CATALOG {
                    let mark = if selected.iter().any(|s| s == interest.label) { "x" } else { " " };
                    println!("[{mark}] {}", interest.label);
                }
            })
        }

        Command::Communities {
            category,
            search,
            near,
        } => {
            if let Some(query) = &search {
                app.preferences().add_search_query(query).await?;
            }
            let origin = resolve_origin(app, near).await?;
            let filter = CommunityFilter { category, search };
            let list = app.load_communities().execute(&filter, origin).await?;
            emit(json_output, &list, || {
                if list.is_empty() {
                    println!("no communities found");
                }
                list.iter().for_each(print_community);
            })
        }

        Command::Join { id } => {
            require_signed_in(app)?;
            let change = app.membership().join(&id).await?;
            emit(json_output, &json!({ "communityId": change.community_id, "joined": true, "memberCount": change.member_count }), || {
                match change.member_count {
                    Some(count) => println!("joined {id} ({} members)", format_member_count(count)),
                    None => println!("joined {id}"),
                }
            })
        }

        Command::Leave { id } => {
            require_signed_in(app)?;
            let change = app.membership().leave(&id).await?;
            emit(json_output, &json!({ "communityId": change.community_id, "joined": false, "memberCount": change.member_count }), || {
                println!("left {id}")
            })
        }

        Command::CreateCommunity {
            title,
            description,
            category,
            tags,
            image,
        } => {
            require_signed_in(app)?;
            let new = NewCommunity {
                title,
                description,
                category,
                tags,
                image,
            };
            let created = app.create_community().execute(&new).await?;
            emit(json_output, &created, || print_community(&created))
        }

        Command::Profile {
            id,
            name,
            bio,
            avatar,
        } => {
            if let Some(id) = id {
                let user = app
                    .api()
                    .get_user(&id)
                    .await?
                    .with_context(|| format!("no user with id `{id}`"))?;
                return emit(json_output, &user, || print_user(&user));
            }

            let mut user = require_signed_in(app)?;
            let mut update = ProfileUpdate {
                name,
                bio,
                ..Default::default()
            };
            if let Some(path) = avatar {
                let uploaded = app.api().upload_avatar(&path).await?;
                update.avatar = Some(uploaded.avatar_url);
            }
            if !update.is_empty() {
                app.api().update_profile(&update).await?;
                update.apply_to(&mut user);
                app.session().set_user(Some(user.clone()));
                app.session().flush().await?;
            }
            emit(json_output, &user, || print_user(&user))
        }

        Command::Nearby { location, radius } => {
            let location = location.map(|(lat, lon)| GeoPoint::new(lat, lon));
            let users = app
                .nearby()
                .execute(location, radius.unwrap_or(DEFAULT_NEARBY_RADIUS_M))
                .await?;
            emit(json_output, &users, || {
                if users.is_empty() {
                    println!("nobody nearby");
                }
                users.iter().for_each(print_user);
            })
        }

        Command::Comments { community_id } => {
            let comments = app.api().list_comments(&community_id).await?;
            emit(json_output, &comments, || comments.iter().for_each(print_comment))
        }

        Command::Comment(CommentCommand::Add { community_id, text }) => {
            require_signed_in(app)?;
            let comment = app.api().create_comment(&community_id, &text).await?;
            emit(json_output, &comment, || print_comment(&comment))
        }

        Command::Comment(CommentCommand::Like { comment_id }) => {
            let ack = app.api().like_comment(&comment_id).await?;
            emit(json_output, &ack, || println!("liked {comment_id}"))
        }

        Command::Comment(CommentCommand::Delete { comment_id }) => {
            let ack = app.api().delete_comment(&comment_id).await?;
            emit(json_output, &ack, || println!("deleted {comment_id}"))
        }

        Command::Prefs {
            theme,
            radius,
            auto_location,
        } => {
            let prefs = app.preferences();
            let mut update = PreferencesUpdate::default();
            if let Some(theme) = theme {
                let theme: Theme = serde_json::from_value(json!(theme))?;
                prefs.set_theme(theme).await?;
                update.theme = Some(theme);
            }
            if radius.is_some() || auto_location.is_some() {
                let current = prefs.user_preferences().await?.search;
                update.search = Some(SearchPreferences {
                    radius: radius.unwrap_or(current.radius),
                    auto_location: auto_location.unwrap_or(current.auto_location),
                });
            }
            let merged = prefs.update_preferences(update).await?;
            let keys = prefs.storage_keys().await?;
            let size = prefs.storage_size().await?;
            let onboarding_completed = prefs.is_onboarding_completed().await?;
            let report = json!({
                "preferences": merged,
                "onboardingCompleted": onboarding_completed,
                "storageKeys": keys,
                "storageBytes": size,
            });
            emit(json_output, &report, || {
                println!("theme:          {:?}", merged.theme);
                println!("search radius:  {} km", merged.search.radius);
                println!("auto location:  {}", merged.search.auto_location);
                println!("onboarded:      {onboarding_completed}");
                println!("storage:        {} keys, {size} bytes", keys.len());
            })
        }

        Command::History { clear } => {
            if clear {
                app.preferences().clear_search_history().await?;
            }
            let history = app.preferences().search_history().await?;
            emit(json_output, &history, || {
                history.iter().for_each(|q| println!("{q}"))
            })
        }

        Command::Favorite(FavoriteCommand::Add { community_id }) => {
            let added = app.preferences().add_favorite(&community_id).await?;
            emit(json_output, &json!({ "communityId": community_id, "added": added }), || {
                if added {
                    println!("added {community_id} to favorites");
                } else {
                    println!("{community_id} is already a favorite");
                }
            })
        }

        Command::Favorite(FavoriteCommand::Remove { community_id }) => {
            let removed = app.preferences().remove_favorite(&community_id).await?;
            emit(json_output, &json!({ "communityId": community_id, "removed": removed }), || {
                println!("removed {community_id} from favorites")
            })
        }

        Command::Favorite(FavoriteCommand::List) => {
            let favorites = app.preferences().favorite_communities().await?;
            emit(json_output, &favorites, || {
                favorites.iter().for_each(|id| println!("{id}"))
            })
        }
    }
}
