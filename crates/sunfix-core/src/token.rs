//! Lexical PHP tokens

use serde::Serialize;

/// Kind of a lexical token.
///
/// Keyword kinds are only produced for the reserved words rules need to tell
/// apart; every other reserved word is `Keyword`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// `<?php` including the single whitespace character after it
    OpenTag,
    /// `<?=`
    OpenTagWithEcho,
    /// `?>`
    CloseTag,
    /// Text outside of PHP tags
    InlineHtml,
    Whitespace,
    /// `//`, `#` and `/* */` comments
    Comment,
    /// `/** */` comments
    DocComment,
    /// `$name`
    Variable,
    /// Names, including property and method names
    Identifier,
    /// `true`, `false` or `null` in any casing
    NativeConstant,
    Number,
    /// Quoted strings, heredocs and nowdocs, kept whole
    StringLiteral,

    Abstract,
    As,
    Class,
    Const,
    Declare,
    Extends,
    Final,
    /// `function` introducing a named function or method
    Function,
    /// `function` introducing an anonymous function
    Closure,
    Implements,
    Instanceof,
    Insteadof,
    Interface,
    Namespace,
    New,
    Private,
    Protected,
    Public,
    Static,
    Trait,
    Use,
    /// Any other reserved word
    Keyword,

    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Comma,
    Equals,
    DoubleColon,
    NsSeparator,
    /// Any other operator or punctuation
    Operator,
}

impl TokenKind {
    /// Whitespace and comments carry no meaning for the grammar
    pub fn is_significant(self) -> bool {
        !matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::DocComment)
    }

    /// Map a reserved word (any casing) to its kind
    pub fn from_keyword(word: &str) -> Option<TokenKind> {
        let lower = word.to_ascii_lowercase();
        let kind = match lower.as_str() {
            "true" | "false" | "null" => TokenKind::NativeConstant,
            "abstract" => TokenKind::Abstract,
            "as" => TokenKind::As,
            "class" => TokenKind::Class,
            "const" => TokenKind::Const,
            "declare" => TokenKind::Declare,
            "extends" => TokenKind::Extends,
            "final" => TokenKind::Final,
            "function" => TokenKind::Function,
            "implements" => TokenKind::Implements,
            "instanceof" => TokenKind::Instanceof,
            "insteadof" => TokenKind::Insteadof,
            "interface" => TokenKind::Interface,
            "namespace" => TokenKind::Namespace,
            "new" => TokenKind::New,
            "private" => TokenKind::Private,
            "protected" => TokenKind::Protected,
            "public" => TokenKind::Public,
            "static" => TokenKind::Static,
            "trait" => TokenKind::Trait,
            "use" => TokenKind::Use,
            "array" | "break" | "callable" | "case" | "catch" | "clone" | "continue"
            | "default" | "do" | "echo" | "else" | "elseif" | "empty" | "enddeclare"
            | "endfor" | "endforeach" | "endif" | "endswitch" | "endwhile" | "enum"
            | "eval" | "exit" | "die" | "finally" | "fn" | "for" | "foreach" | "global"
            | "goto" | "if" | "include" | "include_once" | "isset" | "list" | "match"
            | "print" | "readonly" | "require" | "require_once" | "return" | "switch"
            | "throw" | "try" | "unset" | "var" | "while" | "yield" | "and" | "or"
            | "xor" => TokenKind::Keyword,
            _ => return None,
        };
        Some(kind)
    }
}

/// A single lexical unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based line the token starts on
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// Build a token whose line is assigned when it lands in a stream
    pub fn detached(kind: TokenKind, text: impl Into<String>) -> Self {
        Self::new(kind, text, 0)
    }

    pub fn is_significant(&self) -> bool {
        self.kind.is_significant()
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// `true`, `false` or `null`, whatever the casing
    pub fn is_native_constant(&self) -> bool {
        self.kind == TokenKind::NativeConstant
    }

    /// Number of line breaks inside the token text
    pub fn newlines(&self) -> usize {
        self.text.matches('\n').count()
    }

    pub fn has_newline(&self) -> bool {
        self.text.contains('\n')
    }

    /// Line of the last character of the token.
    ///
    /// A trailing line break still belongs to the line it terminates.
    pub fn last_line(&self) -> usize {
        let body = self.text.strip_suffix('\n').unwrap_or(&self.text);
        self.line + body.matches('\n').count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_is_case_insensitive() {
        assert_eq!(TokenKind::from_keyword("DECLARE"), Some(TokenKind::Declare));
        assert_eq!(TokenKind::from_keyword("NuLL"), Some(TokenKind::NativeConstant));
        assert_eq!(TokenKind::from_keyword("return"), Some(TokenKind::Keyword));
        assert_eq!(TokenKind::from_keyword("strict_types"), None);
    }

    #[test]
    fn test_significance() {
        assert!(!TokenKind::Whitespace.is_significant());
        assert!(!TokenKind::DocComment.is_significant());
        assert!(TokenKind::OpenTag.is_significant());
        assert!(TokenKind::Semicolon.is_significant());
    }

    #[test]
    fn test_last_line() {
        let tag = Token::new(TokenKind::OpenTag, "<?php\n", 1);
        assert_eq!(tag.last_line(), 1);

        let doc = Token::new(TokenKind::DocComment, "/**\n * x\n */", 3);
        assert_eq!(doc.last_line(), 5);

        let ws = Token::new(TokenKind::Whitespace, "\n\n    ", 2);
        assert_eq!(ws.newlines(), 2);
        assert_eq!(ws.last_line(), 4);
    }
}
