//! Seed records for the mock API.

use chrono::{DateTime, NaiveDate, Utc};

use hb_core::{Comment, Community, CommunityLocation, User, UserLocation};

pub(crate) const LA_LATITUDE: f64 = 34.0522;
pub(crate) const LA_LONGITUDE: f64 = -118.2437;
pub(crate) const LA_ADDRESS: &str = "Los Angeles, CA";

const DAY_MS: i64 = 86_400_000;

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

pub(crate) fn timestamp(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

pub(crate) fn picsum(size: &str, random: impl std::fmt::Display) -> String {
    format!("https://picsum.photos/{size}?random={random}")
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn community(
    id: &str,
    title: &str,
    description: &str,
    member_count: u32,
    category: &str,
    tags: &[&str],
    (latitude, longitude, address): (f64, f64, &str),
    created_by: &str,
    created_at: DateTime<Utc>,
) -> Community {
    Community {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        image: picsum("300/200", id),
        tags: strings(tags),
        member_count,
        category: category.to_string(),
        created_by: created_by.to_string(),
        created_at,
        location: CommunityLocation {
            latitude,
            longitude,
            address: address.to_string(),
        },
        distance: None,
        is_joined: Some(false),
    }
}

pub(crate) fn communities() -> Vec<Community> {
    vec![
        community(
            "1",
            "Local Photographers",
            "A community for photography enthusiasts to share tips, organize photo walks, and showcase their work.",
            234,
            "Art",
            &["Photography", "Art", "Nature"],
            (34.0522, -118.2437, "Downtown LA, CA"),
            "user1",
            date(2024, 1, 15),
        ),
        community(
            "2",
            "Weekend Hikers",
            "Join us for weekend hiking adventures around Los Angeles. All skill levels welcome!",
            156,
            "Sport",
            &["Hiking", "Outdoors", "Fitness"],
            (34.0822, -118.2637, "Hollywood Hills, CA"),
            "user2",
            date(2024, 2, 1),
        ),
        community(
            "3",
            "Coffee & Code",
            "Weekly meetup for developers to work on projects, share knowledge, and network.",
            89,
            "Technology",
            &["Programming", "Networking", "Coffee"],
            (34.0422, -118.2537, "Santa Monica, CA"),
            "user3",
            date(2024, 1, 20),
        ),
    ]
}

fn user(
    id: &str,
    name: &str,
    email: &str,
    bio: &str,
    (latitude, longitude, city): (f64, f64, &str),
    interests: &[&str],
    joined: &str,
) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        avatar: None,
        bio: Some(bio.to_string()),
        interests: strings(interests),
        joined_communities: vec![joined.to_string()],
        is_onboarded: None,
        location: Some(UserLocation {
            latitude,
            longitude,
            city: city.to_string(),
        }),
    }
}

/// The first user is the one the demo credentials sign in as.
pub(crate) fn users() -> Vec<User> {
    vec![
        user(
            "user1",
            "Sarah Johnson",
            "sarah@example.com",
            "Passionate photographer and nature lover. Always looking for the perfect shot!",
            (34.0522, -118.2437, "Downtown LA"),
            &["Photography", "Art", "Coffee", "Travel"],
            "1",
        ),
        user(
            "user2",
            "Mike Chen",
            "mike@example.com",
            "Fitness enthusiast and hiking guide. Love exploring new trails!",
            (34.0822, -118.2637, "Hollywood Hills"),
            &["Hiking", "Fitness", "Cooking", "Photography"],
            "2",
        ),
        user(
            "user3",
            "Alex Rivera",
            "alex@example.com",
            "Full-stack developer and tech enthusiast. Building the future, one line of code at a time.",
            (34.0422, -118.2537, "Santa Monica"),
            &["Programming", "Technology", "Gaming", "Coffee"],
            "3",
        ),
    ]
}

/// Discussion every community starts with, dated relative to `now_ms`.
pub(crate) fn comments(now_ms: i64) -> Vec<Comment> {
    vec![
        Comment {
            id: "comment_1".to_string(),
            text: "Great community! Looking forward to participating.".to_string(),
            author_id: "user_1".to_string(),
            author_name: "Alex Johnson".to_string(),
            author_avatar: picsum("50/50", 1),
            created_at: timestamp(now_ms - DAY_MS),
            likes: 5,
            is_liked: false,
        },
        Comment {
            id: "comment_2".to_string(),
            text: "When is the next meetup?".to_string(),
            author_id: "user_2".to_string(),
            author_name: "Sarah Chen".to_string(),
            author_avatar: picsum("50/50", 2),
            created_at: timestamp(now_ms - DAY_MS / 2),
            likes: 2,
            is_liked: true,
        },
    ]
}
