//! Tokenizer-backed recursive-descent parser for the query dialect.

use crate::error::SqlError;
use orgpulse_core::{Filter, FilterOperator, OrderBy, ParsedIntent, RawQuery, SortDirection};
use serde_json::Value;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

/// Parses [`RawQuery`] text into a [`ParsedIntent`].
pub struct QueryParser {
    dialect: PostgreSqlDialect,
}

impl Clone for QueryParser {
    fn clone(&self) -> Self {
        Self {
            dialect: PostgreSqlDialect {},
        }
    }
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryParser {
    pub fn new() -> Self {
        Self {
            dialect: PostgreSqlDialect {},
        }
    }

    /// Tokenize `sql`, dropping whitespace and comments.
    pub fn tokenize(&self, sql: &str) -> Result<Vec<Token>, SqlError> {
        let tokens = Tokenizer::new(&self.dialect, sql)
            .tokenize()
            .map_err(|e| SqlError::Tokenize(e.to_string()))?;
        Ok(tokens
            .into_iter()
            .filter(|t| !matches!(t, Token::Whitespace(_)))
            .collect())
    }

    /// Parse a query, substituting positional parameters as they are referenced.
    pub fn parse(&self, query: &RawQuery) -> Result<ParsedIntent, SqlError> {
        let tokens = self.tokenize(&query.text)?;
        let mut cursor = Cursor::new(&tokens, query);
        let intent = cursor.parse_statement()?;
        tracing::trace!(?intent, "Parsed query");
        Ok(intent)
    }
}

/// Position within a token stream plus the query whose parameters are bound.
struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    query: &'a RawQuery,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token], query: &'a RawQuery) -> Self {
        Self {
            tokens,
            pos: 0,
            query,
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        let tokens: &'a [Token] = self.tokens;
        tokens.get(self.pos).filter(|t| !matches!(t, Token::EOF))
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|t| is_keyword(t, keyword))
    }

    fn consume_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), SqlError> {
        if self.consume_keyword(keyword) {
            Ok(())
        } else {
            Err(SqlError::unsupported(format!(
                "expected {} but found {}",
                keyword,
                describe(self.peek())
            )))
        }
    }

    // statement := SELECT projection [FROM table tail] [;]
    fn parse_statement(&mut self) -> Result<ParsedIntent, SqlError> {
        if !self.consume_keyword("SELECT") {
            return Err(SqlError::unsupported(format!(
                "only SELECT statements are supported, found {}",
                describe(self.peek())
            )));
        }

        let mut intent = ParsedIntent::default();
        if !self.skip_projection()? {
            return Ok(intent);
        }

        intent.table = Some(self.parse_identifier("table name")?);
        self.parse_tail(&mut intent)?;
        Ok(intent)
    }

    /// Skip the select list. Returns `true` when positioned after `FROM`.
    fn skip_projection(&mut self) -> Result<bool, SqlError> {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        SqlError::unsupported("unbalanced parenthesis in select list")
                    })?;
                }
                t if depth == 0 && is_keyword(t, "FROM") => {
                    self.pos += 1;
                    return Ok(true);
                }
                _ => {}
            }
            self.pos += 1;
        }
        Ok(false)
    }

    // tail := [WHERE predicates] [ORDER BY col [ASC|DESC]] [LIMIT n | OFFSET n]* [;]
    fn parse_tail(&mut self, intent: &mut ParsedIntent) -> Result<(), SqlError> {
        if self.consume_keyword("WHERE") {
            intent.filters.extend(self.parse_where()?);
        }

        if self.consume_keyword("ORDER") {
            self.expect_keyword("BY")?;
            intent.order_by = Some(self.parse_order_by()?);
        }

        loop {
            if self.consume_keyword("LIMIT") {
                if intent.limit.is_some() {
                    return Err(SqlError::unsupported("LIMIT given more than once"));
                }
                intent.limit = Some(self.parse_count("LIMIT")?);
            } else if self.consume_keyword("OFFSET") {
                if intent.offset.is_some() {
                    return Err(SqlError::unsupported("OFFSET given more than once"));
                }
                intent.offset = Some(self.parse_count("OFFSET")?);
            } else {
                break;
            }
        }

        if let (Some(offset), Some(limit)) = (intent.offset, intent.limit)
            && offset.checked_add(limit).is_none()
        {
            return Err(SqlError::unsupported(format!(
                "OFFSET {} with LIMIT {} is out of range",
                offset, limit
            )));
        }

        if matches!(self.peek(), Some(Token::SemiColon)) {
            self.pos += 1;
        }

        match self.peek() {
            None => Ok(()),
            Some(token) => Err(SqlError::unsupported(format!(
                "unexpected {} after {}",
                describe(Some(token)),
                intent.table.as_deref().unwrap_or("statement")
            ))),
        }
    }

    // predicates := predicate ((AND | OR) predicate)*
    //
    // Only the first `column (ILIKE | LIKE) operand` predicate is honored.
    // Every other predicate is skipped, its placeholders still range-checked.
    fn parse_where(&mut self) -> Result<Option<Filter>, SqlError> {
        let mut chosen = None;
        let mut ignored: Vec<String> = Vec::new();

        loop {
            let start = self.pos;
            match self.parse_pattern_predicate()? {
                Some(filter) if chosen.is_none() => chosen = Some(filter),
                _ => {
                    self.pos = start;
                    ignored.push(self.skip_predicate()?);
                }
            }

            if self.consume_keyword("AND") || self.consume_keyword("OR") {
                continue;
            }
            break;
        }

        if !ignored.is_empty() {
            tracing::debug!(
                ignored = %ignored.join(" | "),
                "Ignoring WHERE predicates beyond the single pattern filter"
            );
        }
        Ok(chosen)
    }

    /// Parse `column (ILIKE | LIKE) operand` ending at a predicate boundary.
    ///
    /// Returns `None` (cursor position unspecified) when the predicate has any
    /// other shape.
    fn parse_pattern_predicate(&mut self) -> Result<Option<Filter>, SqlError> {
        let Ok(column) = self.parse_identifier("column name") else {
            return Ok(None);
        };

        let operator = if self.consume_keyword("ILIKE") {
            FilterOperator::ILike
        } else if self.consume_keyword("LIKE") {
            FilterOperator::Like
        } else {
            return Ok(None);
        };

        if !matches!(
            self.peek(),
            Some(Token::Placeholder(_) | Token::Number(..) | Token::SingleQuotedString(_))
        ) {
            return Ok(None);
        }
        let value = self.parse_operand()?;

        if !self.at_predicate_end() {
            return Ok(None);
        }
        Ok(Some(Filter {
            column,
            operator,
            value,
        }))
    }

    /// Skip one predicate up to the next top-level `AND`/`OR` or clause end.
    /// Returns the skipped text.
    fn skip_predicate(&mut self) -> Result<String, SqlError> {
        let mut depth = 0usize;
        let mut skipped = Vec::new();

        while let Some(token) = self.peek() {
            if depth == 0 && self.at_predicate_end() {
                break;
            }
            match token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        SqlError::unsupported("unbalanced parenthesis in WHERE clause")
                    })?;
                }
                Token::Placeholder(placeholder) => {
                    self.resolve_placeholder(placeholder)?;
                }
                _ => {}
            }
            skipped.push(token.to_string());
            self.pos += 1;
        }

        if depth != 0 {
            return Err(SqlError::unsupported("unbalanced parenthesis in WHERE clause"));
        }
        if skipped.is_empty() {
            return Err(SqlError::unsupported(format!(
                "expected a predicate but found {}",
                describe(self.peek())
            )));
        }
        Ok(skipped.join(" "))
    }

    fn at_predicate_end(&self) -> bool {
        match self.peek() {
            None | Some(Token::SemiColon) => true,
            Some(token) => ["AND", "OR", "ORDER", "LIMIT", "OFFSET"]
                .iter()
                .any(|kw| is_keyword(token, kw)),
        }
    }

    fn parse_order_by(&mut self) -> Result<OrderBy, SqlError> {
        let column = self.parse_identifier("ORDER BY column")?;
        let direction = if self.consume_keyword("DESC") {
            SortDirection::Desc
        } else {
            self.consume_keyword("ASC");
            SortDirection::Asc
        };

        if matches!(self.peek(), Some(Token::Comma)) {
            return Err(SqlError::unsupported(
                "ORDER BY supports a single column",
            ));
        }

        Ok(OrderBy { column, direction })
    }

    fn parse_count(&mut self, clause: &str) -> Result<u64, SqlError> {
        let value = self.parse_operand()?;
        as_count(&value).ok_or_else(|| {
            SqlError::unsupported(format!(
                "{} must be a non-negative integer, got {}",
                clause, value
            ))
        })
    }

    /// identifier := word ['.' word]
    fn parse_identifier(&mut self, what: &str) -> Result<String, SqlError> {
        let mut name = self.parse_word(what)?;
        if matches!(self.peek(), Some(Token::Period)) {
            self.pos += 1;
            name.push('.');
            name.push_str(&self.parse_word(what)?);
        }
        Ok(name)
    }

    fn parse_word(&mut self, what: &str) -> Result<String, SqlError> {
        match self.next() {
            Some(Token::Word(word)) if word.quote_style.is_some() || !is_reserved(&word.value) => {
                Ok(word.value.clone())
            }
            other => Err(SqlError::unsupported(format!(
                "expected {} but found {}",
                what,
                describe(other)
            ))),
        }
    }

    // operand := $n | number | 'string'
    fn parse_operand(&mut self) -> Result<Value, SqlError> {
        match self.next() {
            Some(Token::Placeholder(placeholder)) => self.resolve_placeholder(placeholder),
            Some(Token::Number(text, _)) => parse_number(text),
            Some(Token::SingleQuotedString(text)) => Ok(Value::String(text.clone())),
            other => Err(SqlError::unsupported(format!(
                "expected a parameter or literal but found {}",
                describe(other)
            ))),
        }
    }

    fn resolve_placeholder(&self, placeholder: &str) -> Result<Value, SqlError> {
        let index: usize = placeholder
            .strip_prefix('$')
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(|| {
                SqlError::unsupported(format!(
                    "unsupported placeholder {}; use $1, $2, ...",
                    placeholder
                ))
            })?;

        self.query.param(index).cloned().ok_or_else(|| {
            SqlError::unsupported(format!(
                "parameter {} is out of range ({} given)",
                placeholder,
                self.query.params.len()
            ))
        })
    }
}

/// Keywords that terminate a clause and therefore cannot be bare identifiers.
const RESERVED: [&str; 14] = [
    "SELECT", "FROM", "WHERE", "ORDER", "BY", "LIMIT", "OFFSET", "ILIKE", "LIKE", "AND", "OR",
    "ASC", "DESC", "JOIN",
];

fn is_reserved(value: &str) -> bool {
    RESERVED.iter().any(|kw| kw.eq_ignore_ascii_case(value))
}

fn is_keyword(token: &Token, keyword: &str) -> bool {
    matches!(token, Token::Word(word) if word.quote_style.is_none() && word.value.eq_ignore_ascii_case(keyword))
}

fn describe(token: Option<&Token>) -> String {
    match token {
        Some(token) => format!("'{}'", token),
        None => "end of query".to_string(),
    }
}

fn parse_number(text: &str) -> Result<Value, SqlError> {
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Value::from(n));
    }
    text.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| SqlError::unsupported(format!("invalid number literal {}", text)))
}

/// Interpret a bound value as a row count.
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
