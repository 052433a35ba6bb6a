//! Level badge display mapping.

/// Badge emoji shown next to a user's name, by level.
pub fn level_badge(level: i64) -> &'static str {
    match level {
        l if l >= 99 => "👑",
        l if l >= 75 => "💎",
        l if l >= 50 => "🥇",
        l if l >= 25 => "🥈",
        l if l >= 10 => "🥉",
        _ => "⭐",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_thresholds() {
        assert_eq!(level_badge(1), "⭐");
        assert_eq!(level_badge(9), "⭐");
        assert_eq!(level_badge(10), "🥉");
        assert_eq!(level_badge(25), "🥈");
        assert_eq!(level_badge(50), "🥇");
        assert_eq!(level_badge(75), "💎");
        assert_eq!(level_badge(99), "👑");
        assert_eq!(level_badge(200), "👑");
    }
}
