use crate::utils::query_words;

/// Query text split into free text and inline facet filters.
///
/// Recognized filters:
///
/// - `school:LAW` selects a school
/// - `category:Sports`, `cat:Sports` or `affiliation:Greek` selects a
///   category or affiliation (one shared namespace)
/// - `is:followed` restricts to followed clubs
///
/// Values may be double-quoted to include spaces (`category:"Community Service"`).
/// Anything else is free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Free text with filters removed, words separated by single spaces
    pub text: String,
    pub schools: Vec<String>,
    pub categories: Vec<String>,
    pub follow_only: bool,
}

impl ParsedQuery {
    /// Normalized words of the free text
    pub fn words(&self) -> Vec<String> {
        query_words(&self.text)
    }
}

/// Parse raw query text
pub fn parse_query(input: &str) -> ParsedQuery {
    let mut parser = QueryParser::new(input);
    parser.parse()
}

struct QueryParser<'a> {
    input: &'a str,
    pos: usize,
    query: ParsedQuery,
    text: Vec<String>,
}

impl<'a> QueryParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            query: ParsedQuery::default(),
            text: Vec::new(),
        }
    }

    fn parse(&mut self) -> ParsedQuery {
        loop {
            self.skip_whitespace();
            if self.is_eof() {
                break;
            }
            self.parse_term();
        }

        let mut query = std::mem::take(&mut self.query);
        query.text = self.text.join(" ");
        query
    }

    fn parse_term(&mut self) {
        let input = self.input;
        let start = self.pos;

        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                break;
            }
            self.advance();
            if ch == ':' {
                let field = &input[start..self.pos - 1];
                if self.parse_field(field) {
                    return;
                }
                // Not a filter: the colon is part of an ordinary word
                self.pos = start;
                break;
            }
        }

        self.skip_word();
        let word = &input[start..self.pos];
        if !word.is_empty() {
            self.text.push(word.to_string());
        }
    }

    /// Consume a field value. Returns false (consuming nothing) for unknown fields.
    fn parse_field(&mut self, field: &str) -> bool {
        let field = field.to_lowercase();
        if !matches!(field.as_str(), "school" | "category" | "cat" | "affiliation" | "is") {
            return false;
        }

        let value = self.parse_value();
        if value.is_empty() {
            return true;
        }

        match field.as_str() {
            "school" => self.query.schools.push(value),
            "category" | "cat" | "affiliation" => self.query.categories.push(value),
            _ => {
                if value.eq_ignore_ascii_case("followed") || value.eq_ignore_ascii_case("following") {
                    self.query.follow_only = true;
                } else {
                    self.text.push(format!("is:{value}"));
                }
            }
        }
        true
    }

    fn parse_value(&mut self) -> String {
        if self.consume_char('"') {
            let start = self.pos;
            while let Some(ch) = self.peek_char() {
                if ch == '"' {
                    break;
                }
                self.advance();
            }
            let value = self.input[start..self.pos].trim().to_string();
            self.consume_char('"');
            return value;
        }

        let start = self.pos;
        self.skip_word();
        self.input[start..self.pos].to_string()
    }

    fn skip_word(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if !ch.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn consume_char(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}
