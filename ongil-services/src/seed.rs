//! Deterministic sample content for an empty community board.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::community::{Board, CommunityStore, NewPost, StoreError};

struct SamplePost {
    board: Board,
    minutes_ago: i64,
    title: &'static str,
    content: &'static str,
    tags: &'static [&'static str],
    /// Minutes after the post at which each comment arrives.
    comments: &'static [(i64, &'static str)],
}

const SAMPLES: &[SamplePost] = &[
    SamplePost {
        board: Board::Free,
        minutes_ago: 47,
        title: "Watermelon prices doubled, keep the juice on the menu?",
        content: "Fruit costs jumped this month. Pull the watermelon juice for now or raise the price?",
        tags: &["카페/디저트"],
        comments: &[
            (2, "Mark it sold out until prices settle."),
            (6, "Swap in a seasonal fruit for a limited menu."),
            (16, "A note about market pricing cuts complaints."),
        ],
    },
    SamplePost {
        board: Board::Free,
        minutes_ago: 9,
        title: "Best side dishes for a pub",
        content: "Which sides turn over fastest while keeping margins healthy?",
        tags: &["주점/술집"],
        comments: &[
            (3, "Cheese balls move fast and the margin is good."),
            (6, "Gambas take effort but raise the average ticket."),
        ],
    },
    SamplePost {
        board: Board::Free,
        minutes_ago: 120,
        title: "Warm or neutral lighting for a small bistro?",
        content: "Torn between 3000K and 4000K for the dining room.",
        tags: &["양식"],
        comments: &[
            (20, "Mix both and add a dimmer."),
            (70, "Keep the entrance and POS at 4000K."),
        ],
    },
    SamplePost {
        board: Board::Free,
        minutes_ago: 300,
        title: "Delivery minimum on rainy days",
        content: "Orders spike when it rains. Has anyone tuned minimum order or delivery tips for it?",
        tags: &["피자/치킨"],
        comments: &[],
    },
    SamplePost {
        board: Board::Partner,
        minutes_ago: 14,
        title: "Pub looking for a dessert partner",
        content: "We close late and want a nearby cafe to cross-promote dessert sets.",
        tags: &["주점/술집", "카페/디저트"],
        comments: &[(3, "Email offer@example.com"), (10, "Call 010-0000-0000")],
    },
    SamplePost {
        board: Board::Partner,
        minutes_ago: 180,
        title: "Chicken shop seeking a pizza collaboration",
        content: "Bundle deal idea: half-and-half box with a neighbouring pizzeria.",
        tags: &["피자/치킨"],
        comments: &[(15, "Interested, contact biz@example.com")],
    },
];

/// Fill `store` with the sample posts and comments, timed relative to `now`.
/// Returns the number of posts added.
pub fn sample_posts(store: &mut CommunityStore, now: DateTime<Utc>) -> Result<usize, StoreError> {
    for sample in SAMPLES {
        let at = now - Duration::minutes(sample.minutes_ago);
        let id = store
            .create_post_at(
                NewPost::new(sample.board, sample.title, sample.content)
                    .tags(sample.tags.iter().copied()),
                at,
            )?
            .id;
        for &(after, text) in sample.comments {
            let when = (at + Duration::minutes(after)).min(now);
            store.add_comment_at(id, None, text, when)?;
        }
    }
    info!(posts = SAMPLES.len(), "seeded community store");
    Ok(SAMPLES.len())
}

/// Seed only when the store has no posts yet.
pub fn seed_if_empty(store: &mut CommunityStore, now: DateTime<Utc>) -> Result<usize, StoreError> {
    if !store.is_empty() {
        return Ok(0);
    }
    sample_posts(store, now)
}
