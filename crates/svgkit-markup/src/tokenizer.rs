//! Markup tokenizer.
//!
//! Splits SVG markup into a flat list of [`Token`]s. Tokens are byte ranges
//! into the source text; nothing is copied until the parser needs an owned
//! string.
//!
//! The tokenizer tracks whether it is inside a tag. Inside a tag it produces
//! punctuation, identifiers and string literals and drops whitespace. Outside
//! a tag everything up to the next `<` becomes a single text token, whitespace
//! included.

use svgkit_common::excerpt;
use thiserror::Error;
use tracing::debug;

/// Token kinds emitted by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `<`
    AngleOpen,
    /// `>`
    AngleClose,
    /// `/`
    Slash,
    /// `=`
    Equals,
    /// Quoted string, delimiters included in the range.
    StringLiteral,
    /// Tag or attribute name.
    Identifier,
    /// `<!-- ... -->`, delimiters included in the range.
    Comment,
    /// Character data between tags.
    Text,
    /// End of input.
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::AngleOpen => "'<'",
            TokenKind::AngleClose => "'>'",
            TokenKind::Slash => "'/'",
            TokenKind::Equals => "'='",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Identifier => "identifier",
            TokenKind::Comment => "comment",
            TokenKind::Text => "text",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// A token: a kind plus the half-open byte range `start..end` it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// The source text covered by this token.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Length of the token in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the token covers no text (only the end-of-input token does).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Lexical context the tokenizer is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexContext {
    /// Between tags: characters form text runs.
    #[default]
    Content,
    /// Between `<` and `>`: characters form names, strings and punctuation.
    Tag,
}

/// What went wrong while tokenizing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated comment")]
    UnterminatedComment,

    #[error("unexpected character {0:?} inside tag")]
    UnexpectedCharacter(char),

    #[error("unsupported markup declaration")]
    MalformedDeclaration,

    #[error("unterminated declaration")]
    UnterminatedDeclaration,
}

/// A token-level syntax error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at offset {offset}: {excerpt}")]
pub struct LexError {
    pub offset: usize,
    pub kind: LexErrorKind,
    pub excerpt: String,
}

/// Markup tokenizer.
pub struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
    context: LexContext,
    tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            context: LexContext::Content,
            tokens: Vec::new(),
        }
    }

    /// Start in the given context instead of [`LexContext::Content`].
    pub fn with_context(mut self, context: LexContext) -> Self {
        self.context = context;
        self
    }

    fn current_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn emit(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token { kind, start, end });
        self.pos = end;
    }

    fn error(&self, offset: usize, kind: LexErrorKind) -> LexError {
        LexError {
            offset,
            kind,
            excerpt: excerpt(self.source, offset),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(ch) = self.current_char() {
            let start = self.pos;
            match ch {
                '<' => self.lex_markup_open()?,
                _ if self.context == LexContext::Content => self.lex_text(),
                '>' => {
                    self.emit(TokenKind::AngleClose, start, start + 1);
                    self.context = LexContext::Content;
                }
                '/' => self.emit(TokenKind::Slash, start, start + 1),
                '=' => self.emit(TokenKind::Equals, start, start + 1),
                '"' | '\'' => self.lex_string(ch)?,
                c if is_whitespace(c) => self.pos += 1,
                c if c.is_alphabetic() => self.lex_identifier(),
                c => return Err(self.error(start, LexErrorKind::UnexpectedCharacter(c))),
            }
        }

        let end = self.source.len();
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            start: end,
            end,
        });
        debug!(token_count = self.tokens.len(), "Tokenized markup");
        Ok(self.tokens)
    }

    /// Handle `<`: comments, skipped declarations, or the start of a tag.
    fn lex_markup_open(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let rest = self.rest();

        if rest.starts_with("<!--") {
            let body = start + 4;
            match self.source[body..].find("-->") {
                Some(idx) => {
                    self.emit(TokenKind::Comment, start, body + idx + 3);
                    self.context = LexContext::Content;
                    Ok(())
                }
                None => Err(self.error(start, LexErrorKind::UnterminatedComment)),
            }
        } else if rest.starts_with("<!") {
            let is_doctype = rest
                .get(2..9)
                .is_some_and(|keyword| keyword.eq_ignore_ascii_case("doctype"));
            if !is_doctype {
                return Err(self.error(start, LexErrorKind::MalformedDeclaration));
            }
            self.skip_doctype(start)
        } else if rest.starts_with("<?") {
            match self.source[start + 2..].find("?>") {
                Some(idx) => {
                    self.pos = start + 2 + idx + 2;
                    self.context = LexContext::Content;
                    Ok(())
                }
                None => Err(self.error(start, LexErrorKind::UnterminatedDeclaration)),
            }
        } else {
            self.emit(TokenKind::AngleOpen, start, start + 1);
            self.context = LexContext::Tag;
            Ok(())
        }
    }

    /// Skip `<!DOCTYPE ...>`, including a bracketed internal subset and
    /// quoted identifiers that may contain `>`.
    fn skip_doctype(&mut self, start: usize) -> Result<(), LexError> {
        let mut depth = 0usize;
        let mut quote: Option<char> = None;

        for (idx, ch) in self.source[start + 2..].char_indices() {
            match (quote, ch) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(ch),
                (None, '[') => depth += 1,
                (None, ']') => depth = depth.saturating_sub(1),
                (None, '>') if depth == 0 => {
                    self.pos = start + 2 + idx + 1;
                    self.context = LexContext::Content;
                    return Ok(());
                }
                _ => {}
            }
        }

        Err(self.error(start, LexErrorKind::UnterminatedDeclaration))
    }

    fn lex_text(&mut self) {
        let start = self.pos;
        let end = self.rest().find('<').map_or(self.source.len(), |idx| start + idx);
        self.emit(TokenKind::Text, start, end);
    }

    fn lex_string(&mut self, quote: char) -> Result<(), LexError> {
        let start = self.pos;
        match self.source[start + 1..].find(quote) {
            Some(idx) => {
                self.emit(TokenKind::StringLiteral, start, start + 1 + idx + 1);
                Ok(())
            }
            None => Err(self.error(start, LexErrorKind::UnterminatedString)),
        }
    }

    fn lex_identifier(&mut self) {
        let start = self.pos;
        let len = self
            .rest()
            .char_indices()
            .skip(1)
            .find(|&(_, c)| !is_name_char(c))
            .map_or(self.rest().len(), |(idx, _)| idx);
        self.emit(TokenKind::Identifier, start, start + len);
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == ':'
}

/// Tokenize markup starting outside of any tag.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Tokenizer::new(source).tokenize()
}

/// Tokenize a fragment that starts in the given context.
pub fn tokenize_fragment(source: &str, context: LexContext) -> Result<Vec<Token>, LexError> {
    Tokenizer::new(source).with_context(context).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_self_closing_tag() {
        use TokenKind::*;
        assert_eq!(
            kinds(r#"<rect width="10"/>"#),
            vec![AngleOpen, Identifier, Identifier, Equals, StringLiteral, Slash, AngleClose, Eof]
        );
    }

    #[test]
    fn test_token_ranges_borrow_source() {
        let src = r#"<path d="M0 0"/>"#;
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens[1].text(src), "path");
        assert_eq!(tokens[2].text(src), "d");
        assert_eq!(tokens[4].text(src), "\"M0 0\"");
    }

    #[test]
    fn test_text_run_keeps_whitespace() {
        let src = "<title> Hello\n  world </title>";
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens[3].kind, TokenKind::Text);
        assert_eq!(tokens[3].text(src), " Hello\n  world ");
    }

    #[test]
    fn test_whitespace_only_text_run() {
        let src = "<g>\n  </g>";
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens[3].kind, TokenKind::Text);
        assert_eq!(tokens[3].text(src), "\n  ");
    }

    #[test]
    fn test_whitespace_inside_tag_is_dropped() {
        use TokenKind::*;
        assert_eq!(
            kinds("<g \n\t id = 'a' \r\n>"),
            vec![AngleOpen, Identifier, Identifier, Equals, StringLiteral, AngleClose, Eof]
        );
    }

    #[test]
    fn test_comment_is_single_token() {
        let src = "<!-- a <b> c -->";
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].len(), src.len());
    }

    #[test]
    fn test_doctype_and_prolog_are_skipped() {
        use TokenKind::*;
        let src = concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
            "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">",
            "<svg/>"
        );
        assert_eq!(kinds(src), vec![AngleOpen, Identifier, Slash, AngleClose, Eof]);
    }

    #[test]
    fn test_doctype_internal_subset() {
        use TokenKind::*;
        let src = "<!DOCTYPE svg [ <!ENTITY a \"b>\"> ]><svg/>";
        assert_eq!(kinds(src), vec![AngleOpen, Identifier, Slash, AngleClose, Eof]);
    }

    #[test]
    fn test_identifier_characters() {
        let src = "<svg xmlns:xlink=\"x\" stroke-width2=\"1\">";
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens[2].text(src), "xmlns:xlink");
        assert_eq!(tokens[5].text(src), "stroke-width2");
    }

    #[test]
    fn test_eof_offset() {
        let src = "<svg/>";
        let tokens = tokenize(src).unwrap();
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.start, src.len());
        assert!(eof.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("<svg a=\"oops>").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!(err.offset, 7);
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize("<svg><!-- never closed").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
        assert_eq!(err.offset, 5);
    }

    #[test]
    fn test_invalid_character_in_tag() {
        let err = tokenize("<svg #>").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('#'));
        assert_eq!(err.offset, 5);
        assert!(err.to_string().contains("offset 5"));
    }

    #[test]
    fn test_unknown_declaration() {
        let err = tokenize("<![CDATA[x]]>").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::MalformedDeclaration);
    }

    #[test]
    fn test_unterminated_prolog() {
        let err = tokenize("<?xml version=\"1.0\"").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedDeclaration);
    }

    #[test]
    fn test_gt_outside_tag_is_text() {
        let src = "<a>1 > 0</a>";
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens[3].kind, TokenKind::Text);
        assert_eq!(tokens[3].text(src), "1 > 0");
    }

    #[test]
    fn test_retokenizing_single_token() {
        let src = concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox='0 0 10 10'>\n",
            "  <!-- outline -->\n",
            "  <g fill=\"#fff\"><path d=\"M0 0 L10 10\"/></g>\n",
            "  <title>icon</title>\n",
            "</svg>"
        );
        let tokens = tokenize(src).unwrap();
        for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
            let context = match token.kind {
                TokenKind::Text | TokenKind::Comment => LexContext::Content,
                _ => LexContext::Tag,
            };
            let again = tokenize_fragment(token.text(src), context).unwrap();
            assert_eq!(again[0].kind, token.kind, "token {:?}", token);
            assert_eq!(again[0].len(), token.len(), "token {:?}", token);
        }
    }
}
