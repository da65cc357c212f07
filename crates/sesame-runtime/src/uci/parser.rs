//! UCI text format parser.
//!
//! Recognized lines:
//!
//! ```text
//! package <name>
//! config <type> ['<name>']
//!     option <name> '<value>'
//!     list <name> '<value>'
//! # comment
//! ```
//!
//! Values may be unquoted, single-quoted (verbatim) or double-quoted
//! (backslash escapes). Quoted pieces directly next to each other form
//! one token.

use super::{StoreError, UciPackage, UciSection};

/// Parses the text of one package.
///
/// # Errors
///
/// Returns [`StoreError::Parse`] with the 1-based line number for
/// unterminated quotes, unknown keywords, wrong argument counts and
/// options appearing before any `config` line.
///
/// # Example
///
/// ```
/// use sesame_runtime::uci::{parse_package, OptionValue};
///
/// let package = parse_package("luci", "
/// config access 'admin'
///     option user 'alice'
///     list write '*'
/// ").unwrap();
///
/// let section = &package.sections()[0];
/// assert_eq!(section.section_type(), "access");
/// assert_eq!(section.option("user").and_then(OptionValue::as_scalar), Some("alice"));
/// ```
pub fn parse_package(name: &str, text: &str) -> Result<UciPackage, StoreError> {
    let mut package = UciPackage::new(name);
    let mut current = None;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let tokens = tokenize(line).map_err(|msg| StoreError::parse(name, line_no, msg))?;

        let Some((keyword, args)) = tokens.split_first() else {
            continue;
        };

        match keyword.as_str() {
            "package" => {
                expect_args(name, line_no, keyword, args, 1, 1)?;
            }
            "config" => {
                expect_args(name, line_no, keyword, args, 1, 2)?;
                let section_type = args[0].clone();
                let section = match args.get(1) {
                    Some(section_name) => UciSection::new(section_type, section_name.clone()),
                    None => {
                        let index = package.count_of_type(&section_type);
                        UciSection::anonymous(section_type, index)
                    }
                };
                current = Some(package.open_section(section));
            }
            "option" | "list" => {
                expect_args(name, line_no, keyword, args, 2, 2)?;
                let section = current.and_then(|i| package.section_mut(i)).ok_or_else(|| {
                    StoreError::parse(name, line_no, format!("'{keyword}' outside of a section"))
                })?;
                if keyword == "option" {
                    section.set_option(args[0].clone(), args[1].clone());
                } else {
                    section.add_list(args[0].clone(), args[1].clone());
                }
            }
            other => {
                return Err(StoreError::parse(
                    name,
                    line_no,
                    format!("unknown keyword '{other}'"),
                ));
            }
        }
    }

    Ok(package)
}

fn expect_args(
    package: &str,
    line_no: usize,
    keyword: &str,
    args: &[String],
    min: usize,
    max: usize,
) -> Result<(), StoreError> {
    if args.len() < min || args.len() > max {
        return Err(StoreError::parse(
            package,
            line_no,
            format!("'{keyword}' takes {min}..={max} arguments, got {}", args.len()),
        ));
    }
    Ok(())
}

/// Splits one line into tokens, dropping trailing comments.
fn tokenize(line: &str) -> Result<Vec<String>, &'static str> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        match chars.peek() {
            None | Some('#') => break,
            Some(_) => {}
        }

        let mut token = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            chars.next();
            match c {
                '\'' => loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => token.push(ch),
                        None => return Err("unterminated single quote"),
                    }
                },
                '"' => loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(ch) => token.push(ch),
                            None => return Err("dangling escape in double quote"),
                        },
                        Some(ch) => token.push(ch),
                        None => return Err("unterminated double quote"),
                    }
                },
                '\\' => match chars.next() {
                    Some(ch) => token.push(ch),
                    None => return Err("dangling escape"),
                },
                _ => token.push(c),
            }
        }
        tokens.push(token);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uci::OptionValue;

    const LUCI: &str = r#"
package luci

# admin has everything
config access 'admin'
	option user 'root'
	list read '*'
	list write '*'

config access
	option user "bob"
	list read 'status-*'
	list read "net\"work"

config core main
	option lang auto
"#;

    #[test]
    fn parses_sections_in_order() {
        let package = parse_package("luci", LUCI).unwrap();
        assert_eq!(package.name(), "luci");
        let names: Vec<&str> = package.sections().iter().map(UciSection::name).collect();
        assert_eq!(names, vec!["admin", "@access[1]", "main"]);
    }

    #[test]
    fn scalar_and_list_options() {
        let package = parse_package("luci", LUCI).unwrap();
        let bob = &package.sections()[1];
        assert!(bob.is_anonymous());
        assert_eq!(bob.option("user").and_then(OptionValue::as_scalar), Some("bob"));
        assert_eq!(
            bob.option("read").and_then(OptionValue::as_list),
            Some(&["status-*".to_string(), "net\"work".to_string()][..])
        );
    }

    #[test]
    fn unquoted_values() {
        let package = parse_package("luci", LUCI).unwrap();
        let core = &package.sections()[2];
        assert_eq!(core.section_type(), "core");
        assert_eq!(core.option("lang").and_then(OptionValue::as_scalar), Some("auto"));
    }

    #[test]
    fn adjacent_quotes_join() {
        let tokens = tokenize(r#"option name 'a b'"c"d"#).unwrap();
        assert_eq!(tokens, vec!["option", "name", "a bcd"]);
    }

    #[test]
    fn trailing_comment_dropped() {
        let tokens = tokenize("list read 'x' # note").unwrap();
        assert_eq!(tokens, vec!["list", "read", "x"]);
    }

    #[test]
    fn unterminated_quote_reports_line() {
        let err = parse_package("luci", "config access 'a'\n\toption user 'alice\n").unwrap_err();
        match err {
            StoreError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn option_outside_section_rejected() {
        let err = parse_package("luci", "option user 'alice'\n").unwrap_err();
        assert!(err.to_string().contains("outside of a section"), "got: {err}");
    }

    #[test]
    fn unknown_keyword_rejected() {
        let err = parse_package("luci", "section access a\n").unwrap_err();
        assert!(err.to_string().contains("unknown keyword"), "got: {err}");
    }

    #[test]
    fn wrong_argument_count_rejected() {
        assert!(parse_package("luci", "config access a b\n").is_err());
        assert!(parse_package("luci", "config access a\n\toption user\n").is_err());
    }

    #[test]
    fn repeated_section_name_merges_into_first() {
        let package = parse_package(
            "luci",
            "config access 'ops'\n\toption user 'bob'\n\tlist read 'a'\n\n\
             config access 'other'\n\toption user 'carol'\n\n\
             config access 'ops'\n\tlist read 'b'\n\toption user 'dave'\n",
        )
        .unwrap();

        assert_eq!(package.sections().len(), 2);
        let ops = &package.sections()[0];
        assert_eq!(ops.name(), "ops");
        assert_eq!(
            ops.option("read").and_then(OptionValue::as_list),
            Some(&["a".to_string(), "b".to_string()][..])
        );
        assert_eq!(ops.option("user").and_then(OptionValue::as_scalar), Some("dave"));
        assert_eq!(
            package.sections()[1].option("user").and_then(OptionValue::as_scalar),
            Some("carol")
        );
    }

    #[test]
    fn anonymous_sections_stay_separate() {
        let package = parse_package(
            "luci",
            "config access\n\toption user 'a'\nconfig access\n\toption user 'b'\n",
        )
        .unwrap();
        assert_eq!(package.sections().len(), 2);
    }

    #[test]
    fn empty_text_is_empty_package() {
        let package = parse_package("luci", "\n# nothing\n").unwrap();
        assert!(package.sections().is_empty());
    }
}
