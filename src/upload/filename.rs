//! Upload file names

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::document::DocumentFormat;

static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap());

/// Reduce a client-supplied file name to a safe ASCII name
///
/// Compatibility-decomposes the name, drops non-ASCII characters, turns path
/// separators into spaces, joins whitespace runs with `_`, removes anything
/// outside `[A-Za-z0-9_.-]` and strips leading and trailing dots and
/// underscores. The result may be empty.
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name.nfkd().filter(char::is_ascii).collect();
    let separated = ascii.replace(['/', '\\'], " ");
    let joined = separated.split_whitespace().collect::<Vec<_>>().join("_");

    UNSAFE_CHARS
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Name under which an upload is stored for a task
///
/// Prefixed with the task id so that concurrent uploads of the same file
/// never collide. The extension is restored when sanitizing removed it.
pub fn stored_file_name(task_id: Uuid, original: &str, format: DocumentFormat) -> String {
    let mut name = secure_filename(original);
    let extension = format.extension();

    let has_extension = DocumentFormat::from_path(std::path::Path::new(&name)) == Some(format);
    if name.is_empty() {
        name = format!("upload.{}", extension);
    } else if !has_extension {
        name = format!("{}.{}", name, extension);
    }

    format!("{}-{}", task_id, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
        assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("i contain cool \u{fc}ml\u{e4}uts.txt"), "i_contain_cool_umlauts.txt");
        assert_eq!(secure_filename("__init__.py"), "init__.py");
        assert_eq!(secure_filename("C:\\Users\\me\\book.pdf"), "C_Users_me_book.pdf");
        assert_eq!(secure_filename("日本語"), "");
    }

    #[test]
    fn test_stored_file_name() {
        let id = Uuid::nil();
        assert_eq!(
            stored_file_name(id, "My Book.PDF", DocumentFormat::Pdf),
            format!("{}-My_Book.PDF", id)
        );
        assert_eq!(
            stored_file_name(id, "日本.txt", DocumentFormat::Txt),
            format!("{}-txt.txt", id)
        );
        assert_eq!(
            stored_file_name(id, "日本語", DocumentFormat::Pdf),
            format!("{}-upload.pdf", id)
        );
    }
}
