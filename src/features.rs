/// The feature mapping: every flag with a visual effect, paired with the CSS
/// class that realizes it on the page's root element. The table is fixed for
/// the process lifetime; flags the table doesn't know (`disableAutoplay`) are
/// handled by bespoke logic instead of a class toggle.
pub(crate) const FEATURES: [(&str, &str); 11] = [
    ("hideRelated", "ft-hide-related"),
    ("hideExplore", "ft-hide-explore"),
    ("hideShorts", "ft-hide-shorts"),
    ("hideChat", "ft-hide-chat"),
    ("hideNotifs", "ft-hide-notifs"),
    ("hideComments", "ft-hide-comments"),
    ("hideDescription", "ft-hide-description"),
    ("hideMetadata", "ft-hide-metadata"),
    ("hideNavbar", "ft-hide-navbar"),
    ("hideLogo", "ft-hide-logo"),
    (DARK_VIDEO_PAGE, "ft-dark-video-page"),
];

/// Drives the true-black theme color on watch pages, in addition to its
/// class in the feature mapping.
pub(crate) const DARK_VIDEO_PAGE: &str = "darkVideoPage";

/// The one behavioral (non-cosmetic) flag; owned by the autoplay suppressor.
pub(crate) const DISABLE_AUTOPLAY: &str = "disableAutoplay";

pub(crate) fn class_for(key: &str) -> Option<&'static str> {
    FEATURES
        .iter()
        .find(|(flag, _)| *flag == key)
        .map(|(_, class)| *class)
}

/// Every key the settings store namespace recognizes. Settings panels bind
/// one checkbox per entry, addressed by the key string itself.
pub fn known_keys() -> impl Iterator<Item = &'static str> {
    FEATURES
        .iter()
        .map(|(flag, _)| *flag)
        .chain(std::iter::once(DISABLE_AUTOPLAY))
}
