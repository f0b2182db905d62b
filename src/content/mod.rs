//! Tool documents: front matter, markdown, section layout and the catalog that loads them.

pub mod frontmatter;
pub(crate) mod html;
pub mod markdown;
pub mod sections;
pub mod tools;
