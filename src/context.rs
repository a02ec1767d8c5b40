use url::Url;

use crate::features;
use crate::page::Page;
use crate::Settings;

const WATCH_PATH: &str = "/watch";

/// Marker class scoping watch-page-only styling rules.
const WATCH_PAGE_CLASS: &str = "ft-is-watch-page";

/// The meta descriptor some browsers use to tint the surrounding chrome
/// (address bar, task switcher) to match the page.
const THEME_COLOR_META: &str = "theme-color";

const TRUE_BLACK: &str = "#000000";

/// Approximates the host site's own dark theme background.
const DEFAULT_DARK: &str = "#0f0f0f";

/// Derived on every check from the location path; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PageType {
    Watch,
    Other,
}

/// `Watch` only on the exact watch path: no suffixes, case-sensitive.
pub fn classify(location: &Url) -> PageType {
    if location.path() == WATCH_PATH {
        PageType::Watch
    } else {
        PageType::Other
    }
}

/// Re-run the context-dependent effects: the watch-page marker class and
/// the interface color hint. Cheap enough to run un-debounced on every
/// navigation event.
pub(crate) fn refresh<P: Page>(page: &P, snapshot: &Settings) {
    let page_type = classify(&page.location());

    match page_type {
        PageType::Watch => page.add_root_class(WATCH_PAGE_CLASS),
        PageType::Other => page.remove_root_class(WATCH_PAGE_CLASS),
    }

    let dark_video_page = snapshot
        .get(features::DARK_VIDEO_PAGE)
        .copied()
        .unwrap_or(false);

    apply_theme_color(page, page_type, dark_video_page);
}

/// Best-effort hint to the browser chrome; ignored hints are silent and
/// non-fatal.
fn apply_theme_color<P: Page>(page: &P, page_type: PageType, dark_video_page: bool) {
    let color = if dark_video_page && page_type == PageType::Watch {
        TRUE_BLACK
    } else {
        DEFAULT_DARK
    };

    page.set_meta(THEME_COLOR_META, color);
}

#[cfg(test)]
mod test {
    use url::Url;

    use super::*;
    use crate::page::Headless;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn classify_matches_the_watch_path_exactly() {
        assert_eq!(classify(&url("https://example.com/watch?v=x")), PageType::Watch);
        assert_eq!(classify(&url("https://example.com/")), PageType::Other);
        assert_eq!(classify(&url("https://example.com/watch/extra")), PageType::Other);
        assert_eq!(classify(&url("https://example.com/Watch")), PageType::Other);
        assert_eq!(classify(&url("https://example.com/watchlist")), PageType::Other);
    }

    #[test]
    fn theme_color_is_true_black_only_on_dark_watch_pages() {
        let dark = Settings::from_iter([(String::from("darkVideoPage"), true)]);

        let watch = Headless::at(url("https://example.com/watch?v=x"));
        refresh(&watch, &dark);
        assert_eq!(watch.meta(THEME_COLOR_META), Some(TRUE_BLACK.into()));
        assert!(watch.has_root_class(WATCH_PAGE_CLASS));

        let home = Headless::at(url("https://example.com/"));
        refresh(&home, &dark);
        assert_eq!(home.meta(THEME_COLOR_META), Some(DEFAULT_DARK.into()));
        assert!(!home.has_root_class(WATCH_PAGE_CLASS));

        let light = Headless::at(url("https://example.com/watch?v=x"));
        refresh(&light, &Settings::default());
        assert_eq!(light.meta(THEME_COLOR_META), Some(DEFAULT_DARK.into()));
    }

    #[test]
    fn navigating_away_reverts_the_marker_and_color() {
        let dark = Settings::from_iter([(String::from("darkVideoPage"), true)]);
        let page = Headless::at(url("https://example.com/watch?v=x"));

        refresh(&page, &dark);
        assert!(page.has_root_class(WATCH_PAGE_CLASS));
        assert_eq!(page.meta(THEME_COLOR_META), Some(TRUE_BLACK.into()));

        page.navigate(url("https://example.com/"));
        refresh(&page, &dark);
        assert!(!page.has_root_class(WATCH_PAGE_CLASS));
        assert_eq!(page.meta(THEME_COLOR_META), Some(DEFAULT_DARK.into()));
    }
}
