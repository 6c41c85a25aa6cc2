/// Path-safe alphabet used to render digests; index is the sextet value.
const TOKEN_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Directory every shortened file is placed in.
pub const SHORTENED_DIR: &str = "res/";

/// Subdirectory prefix of color state list files, which the runtime detects by path.
pub const COLOR_STATE_LIST_PREFIX: &str = "res/color";

/// Number of distinct file references above which tokens grow to three characters.
const LONG_TOKEN_THRESHOLD: usize = 4000;

/// Pieces of a resource file path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathParts<'a> {
    /// Everything up to and including the last `/`; empty for bare file names.
    pub subdir: &'a str,
    /// File name without its extension.
    pub stem: &'a str,
    /// Extension starting at the first `.` of the file name, so `.9.png` stays whole.
    pub extension: &'a str,
}

impl PathParts<'_> {
    /// Whether the file lives in a color state list directory (`res/color`, `res/color-night`, ...).
    pub fn is_color_state_list(&self) -> bool {
        self.subdir.starts_with(COLOR_STATE_LIST_PREFIX)
    }
}

/// Split a file path into subdirectory, stem and extension.
pub fn split_res_path(path: &str) -> PathParts<'_> {
    let (subdir, file_name) = match path.rfind('/') {
        Some(idx) => path.split_at(idx + 1),
        None => ("", path),
    };
    let (stem, extension) = match file_name.find('.') {
        Some(idx) => file_name.split_at(idx),
        None => (file_name, ""),
    };

    PathParts {
        subdir,
        stem,
        extension,
    }
}

/// Token length that keeps the expected share of colliding names low for `count` files.
pub fn optimal_shortened_length(count: usize) -> usize {
    if count > LONG_TOKEN_THRESHOLD { 3 } else { 2 }
}

/// Render the low `num_chars` sextets of `digest`, least significant first.
pub fn shorten_file_name(mut digest: u64, num_chars: usize) -> String {
    let mut token = String::with_capacity(num_chars);
    for _ in 0..num_chars {
        token.push(char::from(TOKEN_ALPHABET[(digest & 0x3f) as usize]));
        digest >>= 6;
    }
    token
}

/// Build the candidate path for a token, appending `suffix` when resolving a collision.
pub fn shortened_path(token: &str, extension: &str, suffix: Option<u64>) -> String {
    match suffix {
        Some(suffix) => format!("{SHORTENED_DIR}{token}{suffix}{extension}"),
        None => format!("{SHORTENED_DIR}{token}{extension}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_resource_paths() {
        let parts = split_res_path("res/drawable-hdpi/icon.png");
        assert_eq!(parts, PathParts {
            subdir: "res/drawable-hdpi/",
            stem: "icon",
            extension: ".png",
        });
    }

    #[test]
    fn keeps_compound_extensions_together() {
        let parts = split_res_path("res/drawable/button.9.png");
        assert_eq!(parts.stem, "button");
        assert_eq!(parts.extension, ".9.png");
    }

    #[test]
    fn handles_bare_names_and_missing_extensions() {
        assert_eq!(split_res_path("LICENSE"), PathParts {
            subdir: "",
            stem: "LICENSE",
            extension: "",
        });
        assert_eq!(split_res_path("res/raw/data").extension, "");
    }

    #[test]
    fn detects_color_state_list_directories() {
        assert!(split_res_path("res/color/tint.xml").is_color_state_list());
        assert!(split_res_path("res/color-night-v8/tint.xml").is_color_state_list());
        assert!(!split_res_path("res/drawable/color.xml").is_color_state_list());
    }

    #[test]
    fn token_length_threshold() {
        assert_eq!(optimal_shortened_length(0), 2);
        assert_eq!(optimal_shortened_length(4000), 2);
        assert_eq!(optimal_shortened_length(4001), 3);
    }

    #[test]
    fn renders_low_sextets_first() {
        // 'x' is sextet 49 and 'y' is sextet 50.
        assert_eq!(shorten_file_name(49 | (50 << 6), 2), "xy");
        assert_eq!(shorten_file_name(0, 3), "AAA");
        assert_eq!(shorten_file_name(u64::MAX, 2), "__");
        assert_eq!(shorten_file_name(62 | (1 << 6) | (27 << 12), 3), "-Bb");
    }

    #[test]
    fn builds_candidate_paths() {
        assert_eq!(shortened_path("xy", ".png", None), "res/xy.png");
        assert_eq!(shortened_path("xy", ".png", Some(0)), "res/xy0.png");
        assert_eq!(shortened_path("xy", "", Some(12)), "res/xy12");
    }
}
