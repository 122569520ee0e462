/*!
 * Caption translation pipeline.
 *
 * - `cue`: translates a single cue through the service client
 * - `document`: fans out over all cues of a document and reassembles them in order
 */

// Re-export main entry points for easier usage
pub use self::cue::{TranslateOptions, translate_cue};
pub use self::document::{translate_cues, translate_document};

// Submodules
pub mod cue;
pub mod document;
