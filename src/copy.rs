use crate::clipboard::Clipboard;
use crate::error::CopyError;
use crate::node::ContentTree;
use crate::selection::Target;

/// What a successful copy action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOutcome {
    /// The serialized selection. Empty when nothing was selected.
    pub text: String,
    /// Number of fragments the target resolved to.
    pub fragments: usize,
    /// False when the selection was empty and the clipboard was left alone.
    pub written: bool,
}

/// Serialize `target` to text.
///
/// Fragments are serialized separately and joined in order. A range that
/// cannot be resolved is logged and contributes nothing. Returns the text and
/// the number of fragments that were resolved.
pub fn selection_text(tree: &ContentTree, target: &Target) -> (String, usize) {
    let mut text = String::new();
    let mut fragments = 0;

    for fragment in target.acquire(tree) {
        match fragment {
            Ok(fragment) => {
                text.push_str(&fragment.to_text());
                fragments += 1;
            }
            Err(e) => log::warn!("selection unavailable: {}", e),
        }
    }

    (text, fragments)
}

/// Copy the text of `target` to `clipboard`.
///
/// An empty selection is not an error: nothing is written. A failed clipboard
/// write is returned with the text so the caller can still use it. There is
/// no retry.
pub fn copy_target(
    tree: &ContentTree,
    target: &Target,
    clipboard: &mut dyn Clipboard,
) -> Result<CopyOutcome, CopyError> {
    let (text, fragments) = selection_text(tree, target);

    if text.is_empty() {
        log::info!("nothing selected, clipboard left unchanged");
        return Ok(CopyOutcome {
            text,
            fragments,
            written: false,
        });
    }

    match clipboard.write_text(&text) {
        Ok(()) => {
            log::info!(
                "copied {} characters from {} fragment(s) via {}",
                text.chars().count(),
                fragments,
                clipboard.name()
            );
            Ok(CopyOutcome {
                text,
                fragments,
                written: true,
            })
        }
        Err(source) => Err(CopyError::Clipboard { text, source }),
    }
}
