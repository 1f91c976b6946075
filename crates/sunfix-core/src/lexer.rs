//! Reference PHP lexer
//!
//! Produces the flat token sequence the rules operate on. It follows the
//! token boundaries of PHP's own tokenizer where rules depend on them:
//!
//! - the open tag swallows one whitespace character (`"<?php\n"`)
//! - `function` directly followed by `(` or `&(` is a closure
//! - names after `->` / `?->` are plain identifiers, never keywords
//! - strings, heredocs and nowdocs stay whole
//!
//! Line comments stop before their line break.

use crate::token::{Token, TokenKind};

/// Operators longer than one character, longest first
const OPERATORS: &[&str] = &[
    "<<=", ">>=", "**=", "...", "<=>", "===", "!==", "??=", "?->", "==", "!=", "<>", "<=",
    ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=", ".=", "%=", "&=", "|=", "^=",
    "->", "=>", "<<", ">>", "??", "**",
];

/// Tokenize a whole source unit
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    in_php: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            line: 1,
            in_php: false,
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        while self.position < self.input.len() {
            if self.in_php {
                self.read_php_token();
            } else {
                self.read_inline_html();
            }
        }
        self.tokens
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn advance_by(&mut self, bytes: usize) {
        self.position = (self.position + bytes).min(self.input.len());
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let token = Token::new(kind, &self.input[start..self.position], self.line);
        self.line += token.newlines();
        self.tokens.push(token);
    }

    fn previous_significant(&self) -> Option<&Token> {
        self.tokens.iter().rev().find(|t| t.is_significant())
    }

    fn read_inline_html(&mut self) {
        let start = self.position;
        match self.rest().find("<?") {
            Some(0) => self.read_open_tag(),
            Some(offset) => {
                self.advance_by(offset);
                self.push(TokenKind::InlineHtml, start);
            }
            None => {
                self.position = self.input.len();
                self.push(TokenKind::InlineHtml, start);
            }
        }
    }

    fn read_open_tag(&mut self) {
        let start = self.position;
        let rest = self.rest();

        let kind = if rest.get(2..5).is_some_and(|tag| tag.eq_ignore_ascii_case("php")) {
            self.advance_by(5);
            TokenKind::OpenTag
        } else if rest.starts_with("<?=") {
            self.advance_by(3);
            TokenKind::OpenTagWithEcho
        } else {
            self.advance_by(2);
            TokenKind::OpenTag
        };

        if kind == TokenKind::OpenTag {
            if self.rest().starts_with("\r\n") {
                self.advance_by(2);
            } else if matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
                self.advance();
            }
        }

        self.push(kind, start);
        self.in_php = true;
    }

    fn read_php_token(&mut self) {
        let start = self.position;
        let Some(ch) = self.peek() else {
            return;
        };
        let rest = self.rest();

        if ch.is_whitespace() {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }
            self.push(TokenKind::Whitespace, start);
            return;
        }

        if rest.starts_with("?>") {
            self.advance_by(2);
            if self.rest().starts_with("\r\n") {
                self.advance_by(2);
            } else if self.peek() == Some('\n') {
                self.advance();
            }
            self.push(TokenKind::CloseTag, start);
            self.in_php = false;
            return;
        }

        if rest.starts_with("#[") {
            self.advance_by(2);
            self.push(TokenKind::OpenBracket, start);
            return;
        }

        if ch == '#' || rest.starts_with("//") {
            self.read_line_comment();
            self.push(TokenKind::Comment, start);
            return;
        }

        if rest.starts_with("/*") {
            let is_doc = rest.starts_with("/**") && rest[3..].starts_with(char::is_whitespace);
            let end = rest[2..].find("*/").map_or(rest.len(), |i| i + 4);
            self.advance_by(end);
            let kind = if is_doc {
                TokenKind::DocComment
            } else {
                TokenKind::Comment
            };
            self.push(kind, start);
            return;
        }

        if ch == '$' && self.peek_nth(1).is_some_and(is_ident_start) {
            self.advance();
            self.read_identifier();
            self.push(TokenKind::Variable, start);
            return;
        }

        if is_ident_start(ch) {
            self.read_identifier();
            let kind = self.classify_word(&self.input[start..self.position]);
            self.push(kind, start);
            return;
        }

        if ch.is_ascii_digit() || (ch == '.' && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit())) {
            self.read_number();
            self.push(TokenKind::Number, start);
            return;
        }

        if ch == '\'' || ch == '"' || ch == '`' {
            self.read_quoted(ch);
            self.push(TokenKind::StringLiteral, start);
            return;
        }

        if rest.starts_with("<<<") && self.read_heredoc() {
            self.push(TokenKind::StringLiteral, start);
            return;
        }

        if rest.starts_with("::") {
            self.advance_by(2);
            self.push(TokenKind::DoubleColon, start);
            return;
        }

        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            self.advance_by(op.len());
            self.push(TokenKind::Operator, start);
            return;
        }

        self.advance();
        let kind = match ch {
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '=' => TokenKind::Equals,
            '\\' => TokenKind::NsSeparator,
            _ => TokenKind::Operator,
        };
        self.push(kind, start);
    }

    fn classify_word(&self, word: &str) -> TokenKind {
        let after_object_operator = self
            .previous_significant()
            .is_some_and(|t| t.kind == TokenKind::Operator && (t.text == "->" || t.text == "?->"));
        if after_object_operator {
            return TokenKind::Identifier;
        }

        match TokenKind::from_keyword(word) {
            Some(TokenKind::Function) if self.starts_closure() => TokenKind::Closure,
            Some(kind) => kind,
            None => TokenKind::Identifier,
        }
    }

    /// After `function`: `(` or `&(` means an anonymous function
    fn starts_closure(&self) -> bool {
        let after = self.rest().trim_start();
        let after = after.strip_prefix('&').map_or(after, str::trim_start);
        after.starts_with('(')
    }

    fn read_identifier(&mut self) {
        while self.peek().is_some_and(is_ident_char) {
            self.advance();
        }
    }

    fn read_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' || self.rest().starts_with("\r\n") || self.rest().starts_with("?>") {
                break;
            }
            self.advance();
        }
    }

    fn read_number(&mut self) {
        let hex = self
            .rest()
            .get(..2)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("0x"));
        let mut prev = '\0';
        while let Some(ch) = self.peek() {
            let exponent_sign = (ch == '+' || ch == '-') && !hex && (prev == 'e' || prev == 'E');
            if ch.is_ascii_alphanumeric() || ch == '_' || exponent_sign {
                self.advance();
            } else if ch == '.' && self.peek_nth(1) != Some('.') && !hex {
                self.advance();
            } else {
                break;
            }
            prev = ch;
        }
    }

    fn read_quoted(&mut self, quote: char) {
        self.advance();
        while let Some(ch) = self.advance() {
            if ch == '\\' {
                self.advance();
            } else if ch == quote {
                break;
            }
        }
    }

    /// Heredoc or nowdoc; false when `<<<` does not open one
    fn read_heredoc(&mut self) -> bool {
        let rest = self.rest();
        let header = rest[3..].trim_start_matches([' ', '\t']);
        let header = header.trim_start_matches(['\'', '"']);
        let label: String = header.chars().take_while(|&c| is_ident_char(c)).collect();
        if label.is_empty() {
            return false;
        }
        let Some(first_break) = rest.find('\n') else {
            return false;
        };

        let mut offset = first_break + 1;
        while offset < rest.len() {
            let line_end = rest[offset..].find('\n').map_or(rest.len(), |i| offset + i);
            let line = &rest[offset..line_end];
            let indent = line.len() - line.trim_start().len();
            let body = &line[indent..];
            if let Some(after) = body.strip_prefix(label.as_str()) {
                if !after.starts_with(is_ident_char) {
                    self.advance_by(offset + indent + label.len());
                    return true;
                }
            }
            offset = line_end + 1;
        }

        self.advance_by(rest.len());
        true
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    fn significant(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .into_iter()
            .filter(|t| t.is_significant())
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_round_trip() {
        let source = "<?php declare(strict_types=1);\n\nnamespace App;\n\n/**\n * @return null\n */\nfunction foo(): ?int { return $x->null ?? NULL; } // done\n$s = \"a {$b}\";\n?>\n<p>html</p>\n";
        let text: String = tokenize(source).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(text, source);
    }

    #[test]
    fn test_open_tag_takes_one_whitespace() {
        let tokens = tokenize("<?php\n\n$a;");
        assert_eq!(tokens[0].text, "<?php\n");
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);
        assert_eq!(tokens[1].text, "\n");
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn test_declare_statement() {
        assert_eq!(
            kinds("<?php declare(strict_types=1);"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Declare,
                TokenKind::OpenParen,
                TokenKind::Identifier,
                TokenKind::Equals,
                TokenKind::Number,
                TokenKind::CloseParen,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_closure_vs_function() {
        let tokens = significant("<?php $f = function () {}; $g = function &($x) {}; function named() {}");
        let functions: Vec<TokenKind> = tokens
            .iter()
            .filter(|(_, text)| text == "function")
            .map(|(kind, _)| *kind)
            .collect();
        assert_eq!(
            functions,
            vec![TokenKind::Closure, TokenKind::Closure, TokenKind::Function]
        );
    }

    #[test]
    fn test_property_names_are_identifiers() {
        let tokens = significant("<?php $a->null; $a?->class; Foo::TRUE;");
        assert_eq!(tokens[3], (TokenKind::Identifier, "null".to_string()));
        assert_eq!(tokens[7], (TokenKind::Identifier, "class".to_string()));
        assert_eq!(tokens[11], (TokenKind::NativeConstant, "TRUE".to_string()));
    }

    #[test]
    fn test_comments() {
        let tokens = tokenize("<?php\n// line\n# hash\n/* block */\n/** doc */\n/**/");
        let comment_kinds: Vec<(TokenKind, &str)> = tokens
            .iter()
            .filter(|t| t.kind.is_comment())
            .map(|t| (t.kind, t.text.as_str()))
            .collect();
        assert_eq!(
            comment_kinds,
            vec![
                (TokenKind::Comment, "// line"),
                (TokenKind::Comment, "# hash"),
                (TokenKind::Comment, "/* block */"),
                (TokenKind::DocComment, "/** doc */"),
                (TokenKind::Comment, "/**/"),
            ]
        );
    }

    #[test]
    fn test_attribute_is_not_a_comment() {
        let tokens = significant("<?php #[Attr] function a() {}");
        assert_eq!(tokens[1], (TokenKind::OpenBracket, "#[".to_string()));
        assert_eq!(tokens[3].0, TokenKind::CloseBracket);
    }

    #[test]
    fn test_heredoc_kept_whole() {
        let source = "<?php\n$a = <<<EOT\nline {$x}\n  EOT;\n";
        let tokens = tokenize(source);
        let heredoc = tokens.iter().find(|t| t.kind == TokenKind::StringLiteral).unwrap();
        assert_eq!(heredoc.text, "<<<EOT\nline {$x}\n  EOT");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Whitespace);
    }

    #[test]
    fn test_names_and_operators() {
        assert_eq!(
            kinds("<?php \\Foo\\Bar::baz() ?-> === =>"),
            vec![
                TokenKind::OpenTag,
                TokenKind::NsSeparator,
                TokenKind::Identifier,
                TokenKind::NsSeparator,
                TokenKind::Identifier,
                TokenKind::DoubleColon,
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
                TokenKind::Whitespace,
                TokenKind::Operator,
                TokenKind::Whitespace,
                TokenKind::Operator,
                TokenKind::Whitespace,
                TokenKind::Operator,
            ]
        );
    }

    #[test]
    fn test_inline_html_around_php() {
        assert_eq!(
            kinds("<b><?= $x ?></b>"),
            vec![
                TokenKind::InlineHtml,
                TokenKind::OpenTagWithEcho,
                TokenKind::Whitespace,
                TokenKind::Variable,
                TokenKind::Whitespace,
                TokenKind::CloseTag,
                TokenKind::InlineHtml,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = significant("<?php 1.5e-3 + 0x1F;");
        assert_eq!(tokens[1], (TokenKind::Number, "1.5e-3".to_string()));
        assert_eq!(tokens[3], (TokenKind::Number, "0x1F".to_string()));
    }
}
