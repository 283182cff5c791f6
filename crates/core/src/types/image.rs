//! Placeholder images for rows without a picture.

/// Shown for sales without an image, or whose image fails to load.
pub const SALE_PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1600607686527-6fb886090705?auto=format&fit=crop&q=80";

/// Shown for team members without a portrait, or whose portrait fails to load.
pub const TEAM_MEMBER_PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1517841905240-472988babdf9?auto=format&fit=crop&q=80";

/// Pick the stored image URL, or the placeholder when it is missing or blank.
#[must_use]
pub fn image_or_placeholder<'a>(url: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match url.map(str::trim) {
        Some(url) if !url.is_empty() => url,
        _ => placeholder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url_uses_placeholder() {
        assert_eq!(
            image_or_placeholder(None, SALE_PLACEHOLDER_IMAGE),
            SALE_PLACEHOLDER_IMAGE
        );
    }

    #[test]
    fn test_blank_url_uses_placeholder() {
        assert_eq!(
            image_or_placeholder(Some("  "), TEAM_MEMBER_PLACEHOLDER_IMAGE),
            TEAM_MEMBER_PLACEHOLDER_IMAGE
        );
    }

    #[test]
    fn test_present_url_wins() {
        assert_eq!(
            image_or_placeholder(Some("https://cdn.test/a.jpg"), SALE_PLACEHOLDER_IMAGE),
            "https://cdn.test/a.jpg"
        );
    }
}
