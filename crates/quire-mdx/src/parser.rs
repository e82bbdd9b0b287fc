//! MDX document parser.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::attributes::{parse_attribute_list, Attribute, AttributeError, AttributeOptions, NodeBuilder};
use crate::codeblock::{extract_filename, parse_code_example_tag, CodeBlock, CodeExample, Language};
use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// A parsed MDX document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Every fenced or indented code block, in document order
    pub code_blocks: Vec<CodeBlock>,

    /// `<CodeExample>` groups
    pub code_examples: Vec<CodeExample>,

    /// `<AttributeTable>` blocks
    pub attribute_tables: Vec<AttributeTable>,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,
}

impl ParsedDoc {
    /// Title from frontmatter, falling back to the first heading.
    pub fn title(&self) -> Option<&str> {
        self.frontmatter
            .as_ref()
            .and_then(|f| f.title.as_deref())
            .or_else(|| self.toc.first().map(|e| e.title.as_str()))
    }
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// A parsed `<AttributeTable>`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeTable {
    /// Line number of the opening tag (1-indexed)
    pub line_number: usize,
    /// Attribute records in source order
    pub attributes: Vec<Attribute>,
}

/// Options controlling document parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Attribute table validation
    pub attributes: AttributeOptions,
}

/// Errors that can occur when parsing MDX.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),

    #[error("Attribute table at line {line}: {source}")]
    Attributes {
        line: usize,
        #[source]
        source: AttributeError,
    },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Parse an MDX document with default (strict) options.
pub fn parse_mdx(source: &str) -> Result<ParsedDoc, ParseError> {
    parse_mdx_with(source, &ParseOptions::default())
}

/// Parse an MDX document.
///
/// Extracts frontmatter, code blocks, code examples, attribute tables and a
/// table of contents. Component tags must sit on their own line, separated
/// from the markdown they wrap by blank lines.
pub fn parse_mdx_with(source: &str, options: &ParseOptions) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    let mut code_blocks = Vec::new();
    let mut code_examples = Vec::new();
    let mut attribute_tables = Vec::new();
    let mut toc = Vec::new();

    let markdown_options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    // `content` is a suffix of `source`; lines before it belong to frontmatter.
    let line_offset = source[..source.len() - content.len()].matches('\n').count();
    let line_at = |offset: usize| line_offset + content[..offset].matches('\n').count() + 1;

    let mut current_code_block: Option<(String, usize, String)> = None; // (info, line, text)
    let mut current_heading: Option<(u8, String)> = None; // (level, text)
    let mut current_example: Option<CodeExample> = None;
    let mut current_table: Option<(usize, NodeBuilder)> = None;

    for (event, range) in Parser::new_ext(content, markdown_options).into_offset_iter() {
        if let Some((line, builder)) = current_table.as_mut() {
            let closes = matches!(&event, Event::Html(html) if html.contains("</AttributeTable>"));
            if !closes {
                builder.push(event);
                continue;
            }

            let line = *line;
            let Some((_, builder)) = current_table.take() else {
                continue;
            };
            let attributes = parse_attribute_list(&builder.finish(), &options.attributes)
                .map_err(|source| ParseError::Attributes { line, source })?;
            attribute_tables.push(AttributeTable {
                line_number: line,
                attributes,
            });
            continue;
        }

        match event {
            Event::Html(html) => {
                let line = line_at(range.start);
                if html.trim_start().starts_with("<AttributeTable") {
                    current_table = Some((line, NodeBuilder::new()));
                } else if let Some((title, href)) = parse_code_example_tag(&html) {
                    if current_example.is_some() {
                        return Err(ParseError::Parse {
                            line,
                            message: "nested <CodeExample> is not supported".to_string(),
                        });
                    }
                    current_example = Some(CodeExample::new(title, href, line));
                } else if html.contains("</CodeExample>") {
                    match current_example.take() {
                        Some(example) => code_examples.push(example),
                        None => {
                            return Err(ParseError::Parse {
                                line,
                                message: "</CodeExample> without an opening tag".to_string(),
                            })
                        }
                    }
                }
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                let info = match &kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                current_code_block = Some((info, line_at(range.start), String::new()));
            }

            Event::Text(text) => {
                if let Some((_, _, ref mut code)) = current_code_block {
                    code.push_str(&text);
                } else if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
            }

            Event::Code(code) => {
                if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&code);
                }
            }

            Event::End(TagEnd::CodeBlock) => {
                if let Some((info, line, text)) = current_code_block.take() {
                    let mut block = CodeBlock::new(Language::from_info(&info), text, line);
                    block.filename = extract_filename(&info);

                    if let Some(example) = current_example.as_mut() {
                        example.snippets.push(block.clone());
                    }
                    code_blocks.push(block);
                }
            }

            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((level as u8, String::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let id = slugify(&title);
                    toc.push(TocEntry { title, id, level });
                }
            }

            _ => {}
        }
    }

    if let Some((line, _)) = current_table {
        return Err(ParseError::Parse {
            line,
            message: "unclosed <AttributeTable>".to_string(),
        });
    }
    if let Some(example) = current_example {
        return Err(ParseError::Parse {
            line: example.line_number,
            message: "unclosed <CodeExample>".to_string(),
        });
    }

    Ok(ParsedDoc {
        frontmatter,
        content: content.to_string(),
        code_blocks,
        code_examples,
        attribute_tables,
        toc,
    })
}

/// Convert a heading to a URL-safe slug.
fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Content;

    #[test]
    fn parses_complete_mdx() {
        let source = r#"---
title: Create an Account
description: Keypairs and funding
---

# Create an Account

Accounts hold balances.

```js
const pair = StellarSdk.Keypair.random();
```

## Funding

Use friendbot on testnet.

```bash
curl "https://friendbot.stellar.org?addr=G..."
```
"#;

        let doc = parse_mdx(source).unwrap();

        let fm = doc.frontmatter.as_ref().unwrap();
        assert_eq!(fm.title.as_deref(), Some("Create an Account"));
        assert_eq!(fm.description.as_deref(), Some("Keypairs and funding"));

        assert_eq!(doc.code_blocks.len(), 2);
        assert_eq!(doc.code_blocks[0].language, Language::JavaScript);
        assert!(doc.code_blocks[0].source.contains("Keypair.random"));
        assert_eq!(doc.code_blocks[0].line_number, 10);
        assert_eq!(doc.code_blocks[1].language, Language::Bash);

        assert_eq!(doc.toc.len(), 2);
        assert_eq!(doc.toc[0].title, "Create an Account");
        assert_eq!(doc.toc[0].level, 1);
        assert_eq!(doc.toc[0].id, "create-an-account");
        assert_eq!(doc.toc[1].title, "Funding");
        assert_eq!(doc.toc[1].level, 2);
    }

    #[test]
    fn parses_without_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter.";

        let doc = parse_mdx(source).unwrap();

        assert!(doc.frontmatter.is_none());
        assert_eq!(doc.toc.len(), 1);
        assert_eq!(doc.title(), Some("Just Markdown"));
    }

    #[test]
    fn groups_code_examples() {
        let source = r#"
# Payments

<CodeExample title="Send a payment" href="https://example.test/payment">

```js
server.submitTransaction(tx);
```

```python
server.submit_transaction(tx)
```

</CodeExample>

```json
{ "outside": true }
```
"#;

        let doc = parse_mdx(source).unwrap();

        assert_eq!(doc.code_blocks.len(), 3);
        assert_eq!(doc.code_examples.len(), 1);

        let example = &doc.code_examples[0];
        assert_eq!(example.title.as_deref(), Some("Send a payment"));
        assert_eq!(example.href.as_deref(), Some("https://example.test/payment"));
        assert_eq!(example.snippets.len(), 2);
        assert_eq!(
            example.copy_text(Some("python")),
            Some("server.submit_transaction(tx)\n")
        );
    }

    #[test]
    fn extracts_attribute_tables() {
        let source = r#"---
title: Accounts
---

# Account Object

<AttributeTable>

- id
  - string
  - The account id.
- balances
  - array
  - Balances held.
    - asset_code
      - string
      - Asset code.

</AttributeTable>

## Next
"#;

        let doc = parse_mdx(source).unwrap();

        assert_eq!(doc.attribute_tables.len(), 1);
        let table = &doc.attribute_tables[0];
        assert_eq!(table.line_number, 7);
        assert_eq!(table.attributes.len(), 2);
        assert_eq!(table.attributes[0].name, "id");
        assert_eq!(
            table.attributes[0].description,
            Content::Single(crate::attributes::Node::text("The account id."))
        );
        assert_eq!(
            table.attributes[1].child_attributes.as_ref().unwrap()[0].name,
            "asset_code"
        );
        // Headings after the table are still collected.
        assert_eq!(doc.toc.len(), 2);
    }

    #[test]
    fn malformed_attribute_table_fails_the_parse() {
        let source = "<AttributeTable>\n\n- id\n  - string\n\n</AttributeTable>\n";

        let result = parse_mdx(source);

        assert!(matches!(
            result,
            Err(ParseError::Attributes {
                line: 1,
                source: AttributeError::MissingDescription { .. }
            })
        ));
    }

    #[test]
    fn unclosed_code_example_is_an_error() {
        let source = "<CodeExample>\n\n```js\nx\n```\n";

        let result = parse_mdx(source);

        assert!(matches!(result, Err(ParseError::Parse { .. })));
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("Button (Primary)"), "button-primary");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }
}
