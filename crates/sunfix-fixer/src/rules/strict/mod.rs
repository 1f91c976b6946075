//! Rules for the `declare(strict_types=1)` statement

mod declare_strict_types;
mod strict_types_on_same_line;

pub use declare_strict_types::DeclareStrictTypesRule;
pub use strict_types_on_same_line::StrictTypesOnSameLineRule;

use sunfix_core::{Token, TokenKind, TokenPattern, TokenStream};

/// `declare(strict_types=1)`, without the terminating semicolon
const DECLARE_STRICT_TYPES: [TokenPattern; 6] = [
    TokenPattern::exact(TokenKind::Declare, "declare"),
    TokenPattern::kind(TokenKind::OpenParen),
    TokenPattern::exact(TokenKind::Identifier, "strict_types"),
    TokenPattern::kind(TokenKind::Equals),
    TokenPattern::exact(TokenKind::Number, "1"),
    TokenPattern::kind(TokenKind::CloseParen),
];

/// First token is the long `<?php` tag
fn starts_with_long_open_tag(stream: &TokenStream) -> bool {
    stream.get(0).is_some_and(|token| {
        token.is(TokenKind::OpenTag)
            && token
                .text
                .get(..5)
                .is_some_and(|tag| tag.eq_ignore_ascii_case("<?php"))
    })
}

fn open_tag(text: &str) -> Token {
    Token::new(TokenKind::OpenTag, text, 1)
}
