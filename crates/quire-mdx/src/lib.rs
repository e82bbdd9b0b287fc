//! MDX parser for documentation content.
//!
//! This crate parses MDX files, extracts YAML frontmatter, groups
//! `<CodeExample>` snippets and reads `<AttributeTable>` lists into
//! structured attribute records for API reference pages.

pub mod attributes;
pub mod codeblock;
pub mod frontmatter;
pub mod parser;

pub use attributes::{
    parse_attribute_list, parse_attribute_table, parse_nodes, Attribute, AttributeError,
    AttributeOptions, Content, Element, Item, Node,
};
pub use codeblock::{CodeBlock, CodeExample, Language};
pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
pub use parser::{parse_mdx, parse_mdx_with, AttributeTable, ParseError, ParseOptions, ParsedDoc};
