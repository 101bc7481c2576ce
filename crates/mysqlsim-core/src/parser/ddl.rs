//! Recursive-descent parser for the MySQL DDL subset.
//!
//! Statements the grammar does not model are swallowed up to the next `;`
//! and returned as [`Statement::Unsupported`], so a replay over a real
//! migration corpus keeps going. Syntax errors *inside* a recognized
//! statement are hard [`ParseError`]s.

use crate::ast::{
    AlterChange, ColumnPosition, ColumnSpec, CreateTableStatement, DataType, DefaultValue,
    IndexKind, Literal, Precision, Reference, Statement, TableDefinition,
};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

use super::error::ParseError;

/// DDL parser.
pub struct Parser<'a> {
    input: &'a str,
    lexer: Lexer<'a>,
    current: Token,
    previous: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            input,
            lexer,
            current,
            previous: Token::new(TokenKind::Eof, Span::new(0, 0)),
        }
    }

    /// Parses a whole source unit into its statements, in order.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` on malformed input inside a recognized
    /// statement. Unrecognized statements do not error; they come back as
    /// `Statement::Unsupported`.
    pub fn parse_script(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();

        loop {
            while self.check(&TokenKind::Semicolon) {
                self.advance();
            }
            if self.current.is_eof() {
                break;
            }

            statements.push(self.parse_statement()?);

            if self.check(&TokenKind::Semicolon) {
                self.advance();
            } else if !self.current.is_eof() {
                return Err(ParseError::unexpected(
                    "';'",
                    self.current.kind.clone(),
                    self.current.span,
                ));
            }
        }

        Ok(statements)
    }

    /// Parses a single statement.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.current.span.start;

        match self.current.as_keyword() {
            Some(Keyword::Create) => self.parse_create(start),
            Some(Keyword::Drop) => self.parse_drop(start),
            Some(Keyword::Alter) => self.parse_alter(start),
            Some(Keyword::Rename) => self.parse_rename(start),
            _ => Ok(self.skip_unsupported_statement(start)),
        }
    }

    // ------------------------------------------------------------------
    // Token plumbing
    // ------------------------------------------------------------------

    fn advance(&mut self) {
        self.previous = std::mem::replace(&mut self.current, self.lexer.next_token());
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current.kind == *kind
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.as_keyword() == Some(keyword)
    }

    /// Consumes the keyword if it is next, returning whether it was.
    fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("{kind:?}")))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.match_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("{keyword:?}")))
        }
    }

    /// Consumes an identifier.
    ///
    /// Non-reserved keywords double as identifiers in MySQL, so a keyword
    /// token in identifier position is taken verbatim from the source.
    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            TokenKind::Keyword(_) => {
                let span = self.current.span;
                let name = String::from(&self.input[span.start..span.end]);
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn expect_integer(&mut self) -> Result<i64, ParseError> {
        match self.current.kind {
            TokenKind::Integer(value) => {
                self.advance();
                Ok(value)
            }
            _ => Err(self.unexpected("integer")),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        if self.current.is_eof() {
            ParseError::unexpected_eof(expected, self.current.span)
        } else {
            ParseError::unexpected(expected, self.current.kind.clone(), self.current.span)
        }
    }

    /// Raw source text from `start` up to the last consumed token.
    fn raw_since(&self, start: usize) -> String {
        let end = self.previous.span.end.max(start);
        String::from(self.input[start..end].trim())
    }

    // ------------------------------------------------------------------
    // Unsupported-construct capture
    // ------------------------------------------------------------------

    /// Skips to the next `;` (exclusive) and wraps the skipped text as an
    /// unsupported statement.
    fn skip_unsupported_statement(&mut self, start: usize) -> Statement {
        while !self.current.is_eof() && !self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        let sql = self.raw_since(start);
        Statement::Unsupported {
            kind: leading_words(&sql),
            sql,
        }
    }

    /// Skips to the next top-level `,` or the end of the statement and
    /// wraps the skipped text as an unsupported change clause.
    fn skip_unsupported_change(&mut self, start: usize) -> AlterChange {
        let mut depth = 0usize;
        loop {
            match &self.current.kind {
                TokenKind::Eof | TokenKind::Semicolon => break,
                TokenKind::Comma if depth == 0 => break,
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
        let sql = self.raw_since(start);
        AlterChange::Unsupported {
            kind: leading_words(&sql),
            sql,
        }
    }

    /// Skips a balanced parenthesized group, including the parentheses.
    fn skip_parenthesized(&mut self) -> Result<(), ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut depth = 1usize;
        while depth > 0 {
            match &self.current.kind {
                TokenKind::Eof => return Err(self.unexpected("')'")),
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth -= 1,
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // CREATE
    // ------------------------------------------------------------------

    fn parse_create(&mut self, start: usize) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Create)?;

        if self.check_keyword(Keyword::Table) {
            return self.parse_create_table();
        }
        if self.check_keyword(Keyword::Index) {
            return self.parse_create_index(IndexKind::Normal);
        }
        if self.check_keyword(Keyword::Unique) && self.peek_is_index() {
            self.advance();
            return self.parse_create_index(IndexKind::Unique);
        }
        if self.check_keyword(Keyword::Fulltext) && self.peek_is_index() {
            self.advance();
            return self.parse_create_index(IndexKind::FullText);
        }

        Ok(self.skip_unsupported_statement(start))
    }

    /// Looks one keyword ahead without consuming; used only to distinguish
    /// `CREATE UNIQUE INDEX` from other `CREATE UNIQUE …` forms.
    fn peek_is_index(&self) -> bool {
        let mut lexer = Lexer::new(&self.input[self.current.span.end..]);
        lexer.next_token().as_keyword() == Some(Keyword::Index)
    }

    fn parse_if_not_exists(&mut self) -> Result<bool, ParseError> {
        if self.match_keyword(Keyword::If) {
            self.expect_keyword(Keyword::Not)?;
            self.expect_keyword(Keyword::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_create_table(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Table)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let table = self.expect_identifier()?;

        if self.match_keyword(Keyword::Like) {
            let source = self.expect_identifier()?;
            return Ok(Statement::CreateTableLike {
                table,
                source,
                if_not_exists,
            });
        }

        self.expect(&TokenKind::LeftParen)?;
        let mut definitions = Vec::new();
        loop {
            definitions.push(self.parse_table_definition()?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(&TokenKind::RightParen)?;

        // Table options (ENGINE=, DEFAULT CHARSET=, AUTO_INCREMENT=, …) do
        // not affect the simulated structure; the serializer emits a fixed
        // set. Skip them.
        while !self.current.is_eof() && !self.check(&TokenKind::Semicolon) {
            self.advance();
        }

        Ok(Statement::CreateTable(CreateTableStatement {
            table,
            definitions,
            if_not_exists,
        }))
    }

    fn parse_table_definition(&mut self) -> Result<TableDefinition, ParseError> {
        if self.match_keyword(Keyword::Primary) {
            self.expect_keyword(Keyword::Key)?;
            let columns = self.parse_index_columns()?;
            return Ok(TableDefinition::PrimaryKey { columns });
        }

        if self.match_keyword(Keyword::Constraint) {
            let symbol = if self.check_keyword(Keyword::Foreign)
                || self.check_keyword(Keyword::Primary)
                || self.check_keyword(Keyword::Unique)
            {
                None
            } else {
                Some(self.expect_identifier()?)
            };

            if self.match_keyword(Keyword::Primary) {
                self.expect_keyword(Keyword::Key)?;
                let columns = self.parse_index_columns()?;
                return Ok(TableDefinition::PrimaryKey { columns });
            }
            if self.match_keyword(Keyword::Unique) {
                return self.parse_index_definition(symbol, IndexKind::Unique);
            }
            self.expect_keyword(Keyword::Foreign)?;
            return self.parse_foreign_key_definition(symbol);
        }

        if self.match_keyword(Keyword::Foreign) {
            return self.parse_foreign_key_definition(None);
        }
        if self.match_keyword(Keyword::Unique) {
            return self.parse_index_definition(None, IndexKind::Unique);
        }
        if self.match_keyword(Keyword::Fulltext) {
            return self.parse_index_definition(None, IndexKind::FullText);
        }
        if self.check_keyword(Keyword::Index) || self.check_keyword(Keyword::Key) {
            self.advance();
            return self.parse_index_definition_named(None, IndexKind::Normal);
        }

        // A column definition.
        let name = self.expect_identifier()?;
        let spec = self.parse_column_spec()?;
        Ok(TableDefinition::Column { name, spec })
    }

    /// Parses `[INDEX|KEY] [name] (columns)` after the kind keyword has been
    /// consumed.
    fn parse_index_definition(
        &mut self,
        symbol: Option<String>,
        kind: IndexKind,
    ) -> Result<TableDefinition, ParseError> {
        if self.check_keyword(Keyword::Index) || self.check_keyword(Keyword::Key) {
            self.advance();
        }
        self.parse_index_definition_named(symbol, kind)
    }

    fn parse_index_definition_named(
        &mut self,
        symbol: Option<String>,
        kind: IndexKind,
    ) -> Result<TableDefinition, ParseError> {
        let name = if self.check(&TokenKind::LeftParen) {
            symbol
        } else {
            Some(self.expect_identifier()?)
        };
        let columns = self.parse_index_columns()?;
        self.skip_index_options();
        Ok(TableDefinition::Index {
            name,
            kind,
            columns,
        })
    }

    fn parse_foreign_key_definition(
        &mut self,
        constraint: Option<String>,
    ) -> Result<TableDefinition, ParseError> {
        self.expect_keyword(Keyword::Key)?;
        let index = if self.check(&TokenKind::LeftParen) {
            None
        } else {
            Some(self.expect_identifier()?)
        };
        let columns = self.parse_index_columns()?;
        let reference = self.parse_reference()?;
        Ok(TableDefinition::ForeignKey {
            constraint,
            index,
            columns,
            reference,
        })
    }

    /// Parses `REFERENCES tbl (columns)` with optional referential actions.
    ///
    /// `ON DELETE`/`ON UPDATE` actions are accepted and discarded; the
    /// simulation tracks structure, not runtime behavior.
    fn parse_reference(&mut self) -> Result<Reference, ParseError> {
        self.expect_keyword(Keyword::References)?;
        let table = self.expect_identifier()?;
        let columns = self.parse_index_columns()?;

        while self.match_keyword(Keyword::On) {
            if !self.match_keyword(Keyword::Delete) {
                self.expect_keyword(Keyword::Update)?;
            }
            self.parse_referential_action()?;
        }

        Ok(Reference { table, columns })
    }

    fn parse_referential_action(&mut self) -> Result<(), ParseError> {
        if self.match_keyword(Keyword::Cascade) || self.match_keyword(Keyword::Restrict) {
            return Ok(());
        }
        if self.match_keyword(Keyword::Set) {
            if !self.match_keyword(Keyword::Null) {
                self.expect_keyword(Keyword::Default)?;
            }
            return Ok(());
        }
        if self.match_keyword(Keyword::No) {
            return self.expect_keyword(Keyword::Action);
        }
        Err(self.unexpected("referential action"))
    }

    /// Parses `(name [(len)] [ASC|DESC], …)`, keeping only the names.
    fn parse_index_columns(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.expect_identifier()?);

            // Optional prefix length.
            if self.check(&TokenKind::LeftParen) {
                self.advance();
                self.expect_integer()?;
                self.expect(&TokenKind::RightParen)?;
            }
            // Optional sort direction.
            if let TokenKind::Identifier(word) = &self.current.kind {
                if word.eq_ignore_ascii_case("asc") || word.eq_ignore_ascii_case("desc") {
                    self.advance();
                }
            }

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(columns)
    }

    /// Skips `USING BTREE`-style index options.
    fn skip_index_options(&mut self) {
        if self.match_keyword(Keyword::Using) {
            if self.check_keyword(Keyword::Btree) || self.check_keyword(Keyword::Hash) {
                self.advance();
            }
        }
    }

    // ------------------------------------------------------------------
    // Column definitions
    // ------------------------------------------------------------------

    fn parse_column_spec(&mut self) -> Result<ColumnSpec, ParseError> {
        let data_type = self.parse_data_type()?;
        let mut spec = ColumnSpec::new(data_type);

        loop {
            if self.match_keyword(Keyword::Not) {
                self.expect_keyword(Keyword::Null)?;
                spec.nullable = false;
            } else if self.match_keyword(Keyword::Null) {
                spec.nullable = true;
            } else if self.match_keyword(Keyword::Default) {
                spec.default = Some(self.parse_default_value()?);
            } else if self.match_keyword(Keyword::AutoIncrement) {
                spec.auto_increment = true;
            } else if self.match_keyword(Keyword::Primary) {
                self.expect_keyword(Keyword::Key)?;
                spec.primary_key = true;
            } else if self.match_keyword(Keyword::Unique) {
                self.match_keyword(Keyword::Key);
                spec.unique = true;
            } else if self.match_keyword(Keyword::Comment) {
                if !matches!(self.current.kind, TokenKind::String(_)) {
                    return Err(self.unexpected("string"));
                }
                self.advance();
            } else if self.match_keyword(Keyword::Collate) {
                self.expect_identifier()?;
            } else if self.match_keyword(Keyword::On) {
                // ON UPDATE CURRENT_TIMESTAMP: runtime behavior, not
                // structure.
                self.expect_keyword(Keyword::Update)?;
                self.expect_keyword(Keyword::CurrentTimestamp)?;
                self.skip_optional_precision()?;
            } else if self.match_keyword(Keyword::References) {
                // MySQL parses and ignores column-level REFERENCES clauses.
                self.expect_identifier()?;
                self.parse_index_columns()?;
                while self.match_keyword(Keyword::On) {
                    if !self.match_keyword(Keyword::Delete) {
                        self.expect_keyword(Keyword::Update)?;
                    }
                    self.parse_referential_action()?;
                }
            } else if self.match_keyword(Keyword::Check) {
                self.skip_parenthesized()?;
            } else {
                break;
            }
        }

        Ok(spec)
    }

    fn parse_default_value(&mut self) -> Result<DefaultValue, ParseError> {
        if self.match_keyword(Keyword::Null) {
            return Ok(DefaultValue::Literal(Literal::Null));
        }
        if self.match_keyword(Keyword::True) {
            return Ok(DefaultValue::Literal(Literal::Bool(true)));
        }
        if self.match_keyword(Keyword::False) {
            return Ok(DefaultValue::Literal(Literal::Bool(false)));
        }
        if self.match_keyword(Keyword::CurrentTimestamp) {
            let precision = self.skip_optional_precision()?;
            return Ok(DefaultValue::CurrentTimestamp { precision });
        }

        let negative = if self.check(&TokenKind::Minus) {
            self.advance();
            true
        } else {
            if self.check(&TokenKind::Plus) {
                self.advance();
            }
            false
        };

        match self.current.kind.clone() {
            TokenKind::Integer(value) => {
                self.advance();
                Ok(DefaultValue::Literal(Literal::Int(if negative {
                    -value
                } else {
                    value
                })))
            }
            TokenKind::Float(value) => {
                self.advance();
                Ok(DefaultValue::Literal(Literal::Float(if negative {
                    -value
                } else {
                    value
                })))
            }
            TokenKind::String(value) if !negative => {
                self.advance();
                Ok(DefaultValue::Literal(Literal::String(value)))
            }
            _ => Err(self.unexpected("default value")),
        }
    }

    /// Consumes `(n)` if present, e.g. after CURRENT_TIMESTAMP. Empty
    /// parentheses (`NOW()`) are accepted as no precision.
    fn skip_optional_precision(&mut self) -> Result<Option<u32>, ParseError> {
        if !self.check(&TokenKind::LeftParen) {
            return Ok(None);
        }
        self.advance();
        if self.check(&TokenKind::RightParen) {
            self.advance();
            return Ok(None);
        }
        let value = self.parse_u32()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Some(value))
    }

    fn parse_u32(&mut self) -> Result<u32, ParseError> {
        let value = self.expect_integer()?;
        u32::try_from(value).map_err(|_| {
            ParseError::new(
                format!("Length out of range: {value}"),
                self.previous.span,
            )
        })
    }

    /// Parses `(length)` if present.
    fn parse_optional_length(&mut self) -> Result<Option<u32>, ParseError> {
        self.skip_optional_precision()
    }

    /// Parses `(length[,decimals])` if present.
    fn parse_optional_precision(&mut self) -> Result<Option<Precision>, ParseError> {
        if !self.check(&TokenKind::LeftParen) {
            return Ok(None);
        }
        self.advance();
        let length = self.parse_u32()?;
        let decimals = if self.check(&TokenKind::Comma) {
            self.advance();
            self.parse_u32()?
        } else {
            0
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(Some(Precision::new(length, decimals)))
    }

    fn parse_unsigned(&mut self) -> bool {
        let unsigned = self.match_keyword(Keyword::Unsigned);
        self.match_keyword(Keyword::Zerofill);
        unsigned
    }

    /// Parses `CHARACTER SET x` / `CHARSET x` following a textual type.
    fn parse_optional_charset(&mut self) -> Result<Option<String>, ParseError> {
        if self.match_keyword(Keyword::Character) {
            self.expect_keyword(Keyword::Set)?;
            return Ok(Some(self.expect_identifier()?));
        }
        if self.match_keyword(Keyword::Charset) {
            return Ok(Some(self.expect_identifier()?));
        }
        Ok(None)
    }

    fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        let keyword = match self.current.as_keyword() {
            Some(kw) => kw,
            None => return Err(self.unexpected("data type")),
        };
        self.advance();

        let data_type = match keyword {
            Keyword::TinyInt => DataType::TinyInt {
                length: self.parse_optional_length()?,
                unsigned: self.parse_unsigned(),
            },
            Keyword::SmallInt => DataType::SmallInt {
                length: self.parse_optional_length()?,
                unsigned: self.parse_unsigned(),
            },
            Keyword::MediumInt => DataType::MediumInt {
                length: self.parse_optional_length()?,
                unsigned: self.parse_unsigned(),
            },
            Keyword::Int | Keyword::Integer => DataType::Int {
                length: self.parse_optional_length()?,
                unsigned: self.parse_unsigned(),
            },
            Keyword::BigInt => DataType::BigInt {
                length: self.parse_optional_length()?,
                unsigned: self.parse_unsigned(),
            },
            Keyword::Bool | Keyword::Boolean => DataType::TinyInt {
                length: Some(1),
                unsigned: false,
            },
            Keyword::Decimal | Keyword::Numeric => DataType::Decimal {
                precision: self.parse_optional_precision()?,
                unsigned: self.parse_unsigned(),
            },
            Keyword::Float => DataType::Float {
                precision: self.parse_optional_precision()?,
                unsigned: self.parse_unsigned(),
            },
            Keyword::Double => {
                self.match_keyword(Keyword::Precision);
                DataType::Double {
                    precision: self.parse_optional_precision()?,
                    unsigned: self.parse_unsigned(),
                }
            }
            Keyword::Real => DataType::Double {
                precision: self.parse_optional_precision()?,
                unsigned: self.parse_unsigned(),
            },
            Keyword::Date => DataType::Date,
            Keyword::Time => DataType::Time,
            Keyword::Year => {
                self.parse_optional_length()?;
                DataType::Year
            }
            Keyword::DateTime => DataType::DateTime {
                fsp: self.parse_optional_length()?,
            },
            Keyword::Timestamp => DataType::Timestamp {
                fsp: self.parse_optional_length()?,
            },
            Keyword::Char => DataType::Char {
                length: self.parse_optional_length()?,
                charset: self.parse_optional_charset()?,
            },
            Keyword::VarChar => {
                self.expect(&TokenKind::LeftParen)?;
                let length = self.parse_u32()?;
                self.expect(&TokenKind::RightParen)?;
                DataType::VarChar {
                    length,
                    charset: self.parse_optional_charset()?,
                }
            }
            Keyword::Text => DataType::Text {
                charset: self.parse_optional_charset()?,
            },
            Keyword::MediumText => DataType::MediumText {
                charset: self.parse_optional_charset()?,
            },
            Keyword::LongText => DataType::LongText {
                charset: self.parse_optional_charset()?,
            },
            Keyword::Enum => {
                let values = self.parse_enum_values()?;
                DataType::Enum {
                    values,
                    charset: self.parse_optional_charset()?,
                }
            }
            Keyword::Binary => DataType::Binary {
                length: self.parse_optional_length()?,
            },
            Keyword::VarBinary => {
                self.expect(&TokenKind::LeftParen)?;
                let length = self.parse_u32()?;
                self.expect(&TokenKind::RightParen)?;
                DataType::VarBinary { length }
            }
            Keyword::TinyBlob => DataType::TinyBlob,
            Keyword::Blob => DataType::Blob {
                length: self.parse_optional_length()?,
            },
            Keyword::MediumBlob => DataType::MediumBlob,
            Keyword::LongBlob => DataType::LongBlob,
            Keyword::Json => DataType::Json,
            _ => {
                return Err(ParseError::unexpected(
                    "data type",
                    self.previous.kind.clone(),
                    self.previous.span,
                ));
            }
        };

        Ok(data_type)
    }

    /// Parses `('a','b',…)` with at least one value.
    fn parse_enum_values(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut values = Vec::new();
        loop {
            match self.current.kind.clone() {
                TokenKind::String(value) => {
                    values.push(value);
                    self.advance();
                }
                _ => return Err(self.unexpected("string")),
            }
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(values)
    }

    fn parse_column_position(&mut self) -> Result<Option<ColumnPosition>, ParseError> {
        if self.match_keyword(Keyword::First) {
            return Ok(Some(ColumnPosition::First));
        }
        if self.match_keyword(Keyword::After) {
            let anchor = self.expect_identifier()?;
            return Ok(Some(ColumnPosition::After(anchor)));
        }
        Ok(None)
    }

    // ------------------------------------------------------------------
    // CREATE INDEX / DROP / RENAME
    // ------------------------------------------------------------------

    fn parse_create_index(&mut self, kind: IndexKind) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Index)?;
        let name = self.expect_identifier()?;
        self.skip_index_options();
        self.expect_keyword(Keyword::On)?;
        let table = self.expect_identifier()?;
        let columns = self.parse_index_columns()?;
        self.skip_index_options();

        Ok(Statement::CreateIndex {
            name,
            kind,
            table,
            columns,
        })
    }

    fn parse_drop(&mut self, start: usize) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Drop)?;

        if self.match_keyword(Keyword::Table) {
            let if_exists = if self.match_keyword(Keyword::If) {
                self.expect_keyword(Keyword::Exists)?;
                true
            } else {
                false
            };
            let table = self.expect_identifier()?;
            return Ok(Statement::DropTable { table, if_exists });
        }

        // DROP INDEX, DROP TRIGGER, DROP DATABASE, …
        Ok(self.skip_unsupported_statement(start))
    }

    fn parse_rename(&mut self, start: usize) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Rename)?;
        if !self.match_keyword(Keyword::Table) {
            return Ok(self.skip_unsupported_statement(start));
        }

        let table = self.expect_identifier()?;
        self.expect_keyword(Keyword::To)?;
        let new_name = self.expect_identifier()?;
        Ok(Statement::RenameTable { table, new_name })
    }

    // ------------------------------------------------------------------
    // ALTER TABLE
    // ------------------------------------------------------------------

    fn parse_alter(&mut self, start: usize) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Alter)?;
        if !self.match_keyword(Keyword::Table) {
            // ALTER DATABASE and friends.
            return Ok(self.skip_unsupported_statement(start));
        }

        let table = self.expect_identifier()?;
        let mut changes = Vec::new();
        loop {
            changes.push(self.parse_alter_change()?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        Ok(Statement::AlterTable { table, changes })
    }

    fn parse_alter_change(&mut self) -> Result<AlterChange, ParseError> {
        let start = self.current.span.start;

        if self.match_keyword(Keyword::Add) {
            return self.parse_alter_add(start);
        }

        if self.match_keyword(Keyword::Change) {
            self.match_keyword(Keyword::Column);
            let old_name = self.expect_identifier()?;
            let new_name = self.expect_identifier()?;
            let spec = self.parse_column_spec()?;
            let position = self.parse_column_position()?;
            return Ok(AlterChange::ChangeColumn {
                old_name,
                new_name,
                spec,
                position,
            });
        }

        if self.match_keyword(Keyword::Modify) {
            self.match_keyword(Keyword::Column);
            let name = self.expect_identifier()?;
            let spec = self.parse_column_spec()?;
            let position = self.parse_column_position()?;
            return Ok(AlterChange::ChangeColumn {
                old_name: name.clone(),
                new_name: name,
                spec,
                position,
            });
        }

        if self.match_keyword(Keyword::Drop) {
            if self.match_keyword(Keyword::Primary) {
                self.expect_keyword(Keyword::Key)?;
                return Ok(AlterChange::DropPrimaryKey);
            }
            if self.match_keyword(Keyword::Foreign) {
                self.expect_keyword(Keyword::Key)?;
                let symbol = self.expect_identifier()?;
                return Ok(AlterChange::DropForeignKey { symbol });
            }
            if self.check_keyword(Keyword::Index) || self.check_keyword(Keyword::Key) {
                self.advance();
                let name = self.expect_identifier()?;
                return Ok(AlterChange::DropIndex { name });
            }
            self.match_keyword(Keyword::Column);
            let name = self.expect_identifier()?;
            return Ok(AlterChange::DropColumn { name });
        }

        if self.check_keyword(Keyword::Alter) {
            self.advance();
            self.match_keyword(Keyword::Column);
            let column = self.expect_identifier()?;
            if self.match_keyword(Keyword::Drop) {
                self.expect_keyword(Keyword::Default)?;
                return Ok(AlterChange::DropDefault { column });
            }
            // ALTER COLUMN … SET DEFAULT is not simulated.
            return Ok(self.skip_unsupported_change(start));
        }

        if self.check_keyword(Keyword::Rename) {
            // RENAME [TO|AS] <name>; RENAME COLUMN/INDEX are not simulated.
            let mut lookahead = Lexer::new(&self.input[self.current.span.end..]);
            let next = lookahead.next_token();
            if matches!(
                next.as_keyword(),
                Some(Keyword::Column) | Some(Keyword::Index) | Some(Keyword::Key)
            ) {
                return Ok(self.skip_unsupported_change(start));
            }
            self.advance();
            if !self.match_keyword(Keyword::To) {
                // RENAME AS <name> is also accepted.
                if let TokenKind::Identifier(word) = &self.current.kind {
                    if word.eq_ignore_ascii_case("as") {
                        self.advance();
                    }
                }
            }
            let new_name = self.expect_identifier()?;
            return Ok(AlterChange::RenameTable { new_name });
        }

        Ok(self.skip_unsupported_change(start))
    }

    fn parse_alter_add(&mut self, start: usize) -> Result<AlterChange, ParseError> {
        if self.match_keyword(Keyword::Primary) {
            self.expect_keyword(Keyword::Key)?;
            let columns = self.parse_index_columns()?;
            return Ok(AlterChange::AddPrimaryKey { columns });
        }

        if self.match_keyword(Keyword::Constraint) {
            let symbol = if self.check_keyword(Keyword::Foreign)
                || self.check_keyword(Keyword::Unique)
                || self.check_keyword(Keyword::Primary)
            {
                None
            } else {
                Some(self.expect_identifier()?)
            };

            if self.match_keyword(Keyword::Primary) {
                self.expect_keyword(Keyword::Key)?;
                let columns = self.parse_index_columns()?;
                return Ok(AlterChange::AddPrimaryKey { columns });
            }
            if self.match_keyword(Keyword::Unique) {
                return self.parse_alter_add_index(symbol, IndexKind::Unique);
            }
            self.expect_keyword(Keyword::Foreign)?;
            return self.parse_alter_add_foreign_key(symbol);
        }

        if self.match_keyword(Keyword::Foreign) {
            return self.parse_alter_add_foreign_key(None);
        }
        if self.match_keyword(Keyword::Unique) {
            return self.parse_alter_add_index(None, IndexKind::Unique);
        }
        if self.match_keyword(Keyword::Fulltext) {
            return self.parse_alter_add_index(None, IndexKind::FullText);
        }
        if self.check_keyword(Keyword::Index) || self.check_keyword(Keyword::Key) {
            self.advance();
            return self.parse_alter_add_index_named(None, IndexKind::Normal);
        }

        if self.check(&TokenKind::LeftParen) {
            // ADD (col, col, …): multi-column shorthand, not simulated.
            return Ok(self.skip_unsupported_change(start));
        }

        self.match_keyword(Keyword::Column);
        let name = self.expect_identifier()?;
        let spec = self.parse_column_spec()?;
        let position = self.parse_column_position()?;
        Ok(AlterChange::AddColumn {
            name,
            spec,
            position,
        })
    }

    fn parse_alter_add_index(
        &mut self,
        symbol: Option<String>,
        kind: IndexKind,
    ) -> Result<AlterChange, ParseError> {
        if self.check_keyword(Keyword::Index) || self.check_keyword(Keyword::Key) {
            self.advance();
        }
        self.parse_alter_add_index_named(symbol, kind)
    }

    fn parse_alter_add_index_named(
        &mut self,
        symbol: Option<String>,
        kind: IndexKind,
    ) -> Result<AlterChange, ParseError> {
        let name = if self.check(&TokenKind::LeftParen) {
            symbol
        } else {
            Some(self.expect_identifier()?)
        };
        let columns = self.parse_index_columns()?;
        self.skip_index_options();
        Ok(AlterChange::AddIndex {
            name,
            kind,
            columns,
        })
    }

    fn parse_alter_add_foreign_key(
        &mut self,
        constraint: Option<String>,
    ) -> Result<AlterChange, ParseError> {
        self.expect_keyword(Keyword::Key)?;
        let index = if self.check(&TokenKind::LeftParen) {
            None
        } else {
            Some(self.expect_identifier()?)
        };
        let columns = self.parse_index_columns()?;
        let reference = self.parse_reference()?;
        Ok(AlterChange::AddForeignKey {
            constraint,
            index,
            columns,
            reference,
        })
    }
}

/// First two words of a statement, upper-cased, as a label for diagnostics.
fn leading_words(sql: &str) -> String {
    sql.split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(sql: &str) -> Vec<Statement> {
        Parser::new(sql).parse_script().expect("parse failed")
    }

    #[test]
    fn test_unsupported_statement_is_captured() {
        let statements = parse("INSERT INTO t VALUES (1); DROP TABLE t;");
        assert_eq!(statements.len(), 2);
        match &statements[0] {
            Statement::Unsupported { kind, sql } => {
                assert_eq!(kind, "INSERT INTO");
                assert_eq!(sql, "INSERT INTO t VALUES (1)");
            }
            other => panic!("expected Unsupported, got {other:?}"),
        }
        assert!(matches!(statements[1], Statement::DropTable { .. }));
    }

    #[test]
    fn test_leading_words() {
        assert_eq!(leading_words("lock tables `x` write"), "LOCK TABLES");
        assert_eq!(leading_words("USE db"), "USE DB");
    }
}
