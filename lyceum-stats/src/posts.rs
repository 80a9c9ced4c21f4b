//! Post/engagement aggregation.

use chrono::Duration;
use lyceum_core::{Post, PostStatus, PostType, Timestamp, UserId};
use std::collections::HashMap;

/// Aggregate over one post collection snapshot.
///
/// `now` is injected by the caller so recent-activity windows are
/// deterministic for a given input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostStats {
    pub total: usize,
    pub published: usize,
    pub drafts: usize,
    pub total_likes: u64,
    pub total_comments: u64,
    pub by_type: HashMap<PostType, usize>,
    pub by_author: HashMap<UserId, usize>,
    /// Posts created within the last seven days.
    pub recent_activity: usize,
    /// `(likes + comments) / total`, zero for an empty collection.
    pub engagement_rate: f64,
}

/// Fold a snapshot of posts into its aggregate.
pub fn post_stats(posts: &[Post], now: Timestamp) -> PostStats {
    if posts.is_empty() {
        return PostStats::default();
    }

    let mut stats = PostStats {
        total: posts.len(),
        ..PostStats::default()
    };
    let recent_cutoff = now - Duration::days(7);

    for post in posts {
        match post.status {
            PostStatus::Published => stats.published += 1,
            PostStatus::Draft => stats.drafts += 1,
        }
        stats.total_likes += post.likes;
        stats.total_comments += post.comments;
        *stats.by_type.entry(post.post_type).or_default() += 1;
        *stats.by_author.entry(post.author_id).or_default() += 1;
        if post.created_at > recent_cutoff {
            stats.recent_activity += 1;
        }
    }

    stats.engagement_rate =
        (stats.total_likes + stats.total_comments) as f64 / stats.total as f64;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lyceum_core::PostId;
    use uuid::Uuid;

    fn post(
        post_type: PostType,
        status: PostStatus,
        likes: u64,
        comments: u64,
        created_at: Timestamp,
    ) -> Post {
        Post {
            post_id: PostId::new(Uuid::new_v4()),
            author_id: UserId::new(Uuid::nil()),
            post_type,
            status,
            title: "announcement".to_string(),
            content: None,
            likes,
            comments,
            classroom_id: None,
            group_id: None,
            student_id: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_empty_collection_yields_zeroed_aggregate() {
        let now = Utc.with_ymd_and_hms(2025, 9, 15, 12, 0, 0).unwrap();
        let stats = post_stats(&[], now);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.engagement_rate, 0.0);
        assert_eq!(stats.recent_activity, 0);
        assert!(stats.by_type.is_empty());
    }

    #[test]
    fn test_counts_likes_and_engagement() {
        let now = Utc.with_ymd_and_hms(2025, 9, 15, 12, 0, 0).unwrap();
        let old = Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap();
        let posts = vec![
            post(PostType::Announcement, PostStatus::Published, 10, 4, old),
            post(PostType::Homework, PostStatus::Draft, 0, 0, old),
            post(PostType::Quiz, PostStatus::Published, 3, 3, old),
        ];
        let stats = post_stats(&posts, now);

        assert_eq!(stats.published, 2);
        assert_eq!(stats.drafts, 1);
        assert_eq!(stats.total_likes, 13);
        assert_eq!(stats.total_comments, 7);
        assert!((stats.engagement_rate - 20.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_recent_activity_window_is_seven_days() {
        let now = Utc.with_ymd_and_hms(2025, 9, 15, 12, 0, 0).unwrap();
        let inside = now - Duration::days(6);
        let boundary = now - Duration::days(7);
        let outside = now - Duration::days(8);
        let posts = vec![
            post(PostType::Poll, PostStatus::Published, 0, 0, inside),
            post(PostType::Poll, PostStatus::Published, 0, 0, boundary),
            post(PostType::Poll, PostStatus::Published, 0, 0, outside),
        ];
        let stats = post_stats(&posts, now);
        assert_eq!(stats.recent_activity, 1);
    }

    #[test]
    fn test_grouping_by_type_and_author() {
        let now = Utc.with_ymd_and_hms(2025, 9, 15, 12, 0, 0).unwrap();
        let author_a = UserId::new(Uuid::new_v4());
        let author_b = UserId::new(Uuid::new_v4());
        let mut p1 = post(PostType::Homework, PostStatus::Published, 0, 0, now);
        p1.author_id = author_a;
        let mut p2 = post(PostType::Homework, PostStatus::Published, 0, 0, now);
        p2.author_id = author_a;
        let mut p3 = post(PostType::Poll, PostStatus::Published, 0, 0, now);
        p3.author_id = author_b;

        let stats = post_stats(&[p1, p2, p3], now);
        assert_eq!(stats.by_type[&PostType::Homework], 2);
        assert_eq!(stats.by_type[&PostType::Poll], 1);
        assert_eq!(stats.by_author[&author_a], 2);
        assert_eq!(stats.by_author[&author_b], 1);
    }

    #[test]
    fn test_same_snapshot_same_output() {
        let now = Utc.with_ymd_and_hms(2025, 9, 15, 12, 0, 0).unwrap();
        let posts = vec![
            post(PostType::Quiz, PostStatus::Published, 5, 2, now),
            post(PostType::Poll, PostStatus::Draft, 1, 0, now),
        ];
        assert_eq!(post_stats(&posts, now), post_stats(&posts, now));
    }
}
