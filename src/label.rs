//! Label extraction from bracketed file-name prefixes.
//!
//! Track names carry their category as a leading bracketed segment, for
//! example `[Rock]song.mp3` or `【Jazz】tune.mp3`. ASCII and the two common
//! full-width bracket styles are accepted, and opening/closing styles may be
//! mixed (`【Rock]song.mp3` is still labeled `Rock`).

/// Label given to names without a leading bracketed segment.
pub const UNLABELED: &str = "unlabeled";

const OPENING_BRACKETS: &[char] = &['[', '【', '［'];
const CLOSING_BRACKETS: &[char] = &[']', '】', '］'];

fn is_opening(c: char) -> bool {
    OPENING_BRACKETS.contains(&c)
}

fn is_closing(c: char) -> bool {
    CLOSING_BRACKETS.contains(&c)
}

/// Extract the label of a track name.
///
/// The label is everything between the leading opening bracket and the last
/// closing bracket in the name. Names that do not start with an opening
/// bracket, or never close it, are [`UNLABELED`].
///
/// ```
/// use mp3_shuffle::label::extract_label;
///
/// assert_eq!(extract_label("[A]song.mp3"), "A");
/// assert_eq!(extract_label("song.mp3"), "unlabeled");
/// ```
pub fn extract_label(name: &str) -> &str {
    let mut chars = name.char_indices();
    let start = match chars.next() {
        Some((_, c)) if is_opening(c) => c.len_utf8(),
        _ => return UNLABELED,
    };

    match name[start..].rfind(is_closing) {
        Some(offset) => &name[start..start + offset],
        None => UNLABELED,
    }
}

/// Name shown next to the sequence number when destination files keep their
/// original title: the text after the label segment, without extension.
pub fn display_name(name: &str) -> &str {
    let title = match name.find(is_opening) {
        Some(open) => {
            let after_open = open + name[open..].chars().next().map_or(1, char::len_utf8);
            match name[after_open..].rfind(is_closing) {
                Some(offset) => {
                    let close = after_open + offset;
                    let width = name[close..].chars().next().map_or(1, char::len_utf8);
                    &name[close + width..]
                }
                None => name,
            }
        }
        None => name,
    };

    strip_extension(title)
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    }
}
