use std::sync::Arc;

/// Host-specific path cleanup applied to keys that are not bundle files.
///
/// Must be pure and idempotent: cleaning an already-cleaned path returns it
/// unchanged.
pub type CleanupFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Host platform whose path conventions the normalizer follows.
///
/// The platform is chosen once at startup and turned into a preferred
/// separator and a cleanup strategy; nothing inspects it afterwards.
///
/// # Variants
///
/// * `Windows` - Backslash-separated keys; cleanup converts `/` to `\` and
///   resolves `.` and `..` segments
/// * `Unix` - Slash-separated keys; cleanup converts `\` to `/`
///
/// # Examples
///
/// ```
/// use contentcache_core::Platform;
///
/// let platform: Platform = "windows".into();
/// assert_eq!(platform.preferred_separator(), '\\');
///
/// let cleanup = Platform::Unix.cleanup();
/// assert_eq!(cleanup("Maps\\Farm"), "Maps/Farm");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    /// Returns the platform this crate was compiled for.
    pub const fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    pub const fn preferred_separator(self) -> char {
        match self {
            Platform::Windows => '\\',
            Platform::Unix => '/',
        }
    }

    /// Returns the cleanup strategy used for keys on this platform.
    pub fn cleanup(self) -> CleanupFn {
        match self {
            Platform::Windows => Arc::new(|path: &str| clean_windows_path(path)),
            Platform::Unix => replace_separator('\\', '/'),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::current()
    }
}

/// Converts a string slice to a `Platform`.
///
/// The conversion is case-insensitive and falls back to [`Platform::current`]
/// for unrecognized values.
///
/// - `"windows"`, `"win"`, `"xna"` → `Platform::Windows`
/// - `"unix"`, `"linux"`, `"macos"`, `"monogame"` → `Platform::Unix`
impl From<&str> for Platform {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "windows" | "win" | "xna" => Platform::Windows,
            "unix" | "linux" | "macos" | "monogame" => Platform::Unix,
            _ => Platform::current(),
        }
    }
}

/// Cleanup strategy that leaves paths untouched.
pub fn identity() -> CleanupFn {
    Arc::new(|path: &str| path.to_string())
}

/// Cleanup strategy that replaces every `from` character with `to`.
///
/// ```
/// use contentcache_core::platform::replace_separator;
///
/// let cleanup = replace_separator('\\', '/');
/// assert_eq!(cleanup("Characters\\Abigail"), "Characters/Abigail");
/// ```
pub fn replace_separator(from: char, to: char) -> CleanupFn {
    Arc::new(move |path: &str| path.replace(from, to.encode_utf8(&mut [0; 4])))
}

/// Cleanup strategy that resolves `.` and `..` segments.
///
/// `.` segments are dropped and every `name/..` pair collapses. Leading `..`
/// segments that have nothing left to collapse against are kept, as is a
/// leading separator.
///
/// ```
/// use contentcache_core::platform::resolve_dot_segments;
///
/// let cleanup = resolve_dot_segments('/');
/// assert_eq!(cleanup("Maps/./Town/../Farm"), "Maps/Farm");
/// assert_eq!(cleanup("../Mods/x/../y"), "../Mods/y");
/// ```
pub fn resolve_dot_segments(separator: char) -> CleanupFn {
    Arc::new(move |path: &str| resolve_dots(path, separator))
}

fn clean_windows_path(path: &str) -> String {
    resolve_dots(&path.replace('/', "\\"), '\\')
}

fn resolve_dots(path: &str, separator: char) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(separator) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let mut cleaned = String::with_capacity(path.len());
    if path.starts_with(separator) {
        cleaned.push(separator);
    }
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            cleaned.push(separator);
        }
        cleaned.push_str(segment);
    }
    cleaned
}
