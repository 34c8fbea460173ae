//! Plain-text rendering of view snapshots

use std::fmt::Write;

use feed_pagination::Affordance;

use crate::media::{MediaCarousel, MediaResolver};
use crate::models::{DashboardProfile, MediaKind, Post, UserProfile};
use crate::views::feed::FeedSnapshot;

pub struct Renderer {
    media: MediaResolver,
}

impl Renderer {
    pub fn new(media: MediaResolver) -> Self {
        Self { media }
    }

    pub fn profile_header(&self, profile: &UserProfile) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", display_name(&profile.username, profile.nickname.as_deref()));
        let _ = writeln!(out, "  avatar: {}", self.media.avatar(profile.profile.as_deref()));
        let _ = writeln!(
            out,
            "  {} posts | {} followers | {} followings",
            profile.total_posts, profile.total_followers, profile.total_followings
        );
        if let Some(bio) = profile.biography.as_deref().filter(|b| !b.is_empty()) {
            let _ = writeln!(out, "  {}", bio);
        }
        out
    }

    pub fn dashboard(&self, me: &DashboardProfile) -> String {
        let mut out = self.profile_header(&me.profile);
        let full_name = [me.first_name.as_deref(), me.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if !full_name.is_empty() {
            let _ = writeln!(out, "  name: {}", full_name);
        }
        if me.total_follow_requests > 0 {
            let _ = writeln!(out, "  {} pending follow requests", me.total_follow_requests);
        }
        out
    }

    pub fn post(&self, post: &Post, carousel: &MediaCarousel) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}  [{}]",
            display_name(&post.user.username, post.user.nickname.as_deref()),
            self.media.avatar(post.user.profile.as_deref())
        );

        if let Some(file) = carousel.current(&post.files) {
            let (kind, url) = self.media.attachment(file);
            let label = match kind {
                MediaKind::Image => "image",
                MediaKind::Video => "video",
            };
            let prev = if carousel.has_previous() { "<" } else { " " };
            let next = if carousel.has_next() { ">" } else { " " };
            let _ = writeln!(
                out,
                "  {} {} {}/{} {} {}",
                prev,
                label,
                carousel.index() + 1,
                carousel.len(),
                url,
                next
            );
        }

        if let Some(caption) = post.caption.as_deref().filter(|c| !c.is_empty()) {
            let _ = writeln!(out, "  {}", caption);
        }
        let _ = writeln!(out, "  likes: {}  comments: {}", post.likes, post.comments.len());
        out
    }

    pub fn posts(&self, posts: &[Post]) -> String {
        posts
            .iter()
            .map(|post| self.post(post, &MediaCarousel::new(post.files.len())))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whatever sits in the sentinel slot below the list
    pub fn affordance(affordance: Affordance) -> &'static str {
        match affordance {
            Affordance::Spinner => "[ loading... ]",
            Affordance::Refresh => "[ refresh (r) ]",
            Affordance::Hidden => "",
        }
    }

    pub fn feed(&self, snapshot: &FeedSnapshot) -> String {
        let mut out = String::new();
        if let Some(profile) = &snapshot.profile {
            out.push_str(&self.profile_header(profile));
            out.push('\n');
        }
        out.push_str(&self.posts(&snapshot.posts));
        let footer = Self::affordance(snapshot.affordance);
        if !footer.is_empty() {
            out.push('\n');
            out.push_str(footer);
            out.push('\n');
        }
        out
    }
}

fn display_name(username: &str, nickname: Option<&str>) -> String {
    match nickname.filter(|n| !n.is_empty()) {
        Some(nick) => format!("@{} ({})", username, nick),
        None => format!("@{}", username),
    }
}
