//! Template parsing.
//!
//! Builds the node tree executed by [`super::exec`]. Supported actions:
//! `{{pipeline}}`, `{{if}}`/`{{else if}}`/`{{else}}`/`{{end}}`,
//! `{{range [$i,] [$e :=] pipeline}}`/`{{else}}`/`{{end}}`, and
//! `{{with pipeline}}`/`{{else}}`/`{{end}}`.

use super::ParseError;
use super::lexer::{Token, Word, split_words};

/// A node of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text.
    Text(String),
    /// Evaluate a pipeline and print its value.
    Print {
        /// Source line.
        line: usize,
        /// Pipeline to print.
        pipeline: Pipeline,
    },
    /// Conditional with optional `else if` chain.
    If {
        /// Source line.
        line: usize,
        /// Condition/body pairs, tried in order.
        branches: Vec<(Pipeline, Vec<Node>)>,
        /// Body when no condition holds.
        otherwise: Vec<Node>,
    },
    /// Iteration over a sequence or mapping.
    Range {
        /// Source line.
        line: usize,
        /// Declared variables: `[elem]` or `[index, elem]`.
        vars: Vec<String>,
        /// Collection pipeline.
        pipeline: Pipeline,
        /// Body per element, with dot bound to the element.
        body: Vec<Node>,
        /// Body when the collection is empty.
        otherwise: Vec<Node>,
    },
    /// `$name := pipeline`; visible until the end of the enclosing block.
    Declare {
        /// Source line.
        line: usize,
        /// Variable name without `$`.
        name: String,
        /// Pipeline whose value is bound.
        pipeline: Pipeline,
    },
    /// Rebinds dot when the pipeline value is non-empty.
    With {
        /// Source line.
        line: usize,
        /// Pipeline whose value becomes dot.
        pipeline: Pipeline,
        /// Body when the value is non-empty.
        body: Vec<Node>,
        /// Body otherwise.
        otherwise: Vec<Node>,
    },
}

/// Commands joined by `|`; each result is appended as the last argument of the next.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    /// Commands in evaluation order; never empty.
    pub commands: Vec<Command>,
}

/// One stage of a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A lone operand.
    Operand(Operand),
    /// A function call.
    Call {
        /// Function name.
        name: String,
        /// Arguments in order.
        args: Vec<Operand>,
    },
}

/// A value reference or literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// `.` or a field chain relative to dot (`.a.b`).
    Field(Vec<String>),
    /// `$`, `$name`, or a field chain below a variable (`$.a`, `$e.val`).
    Variable {
        /// Variable name without `$`; empty for the root.
        name: String,
        /// Field chain below the variable.
        path: Vec<String>,
    },
    /// String literal.
    Str(String),
    /// Integer literal.
    Int(i64),
    /// `true` or `false`.
    Bool(bool),
}

enum Stop {
    Eof,
    End,
    Else,
    ElseIf(Pipeline),
}

/// Parses lexed tokens into a node tree.
pub fn parse(tokens: &[Token]) -> Result<Vec<Node>, ParseError> {
    let mut parser = Parser { tokens, pos: 0 };
    let (nodes, stop) = parser.parse_list()?;
    match stop {
        Stop::Eof => Ok(nodes),
        Stop::End => Err(parser.error("unexpected {{end}}")),
        Stop::Else | Stop::ElseIf(_) => Err(parser.error("unexpected {{else}}")),
    }
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl Parser<'_> {
    fn line(&self) -> usize {
        self.tokens[..self.pos]
            .iter()
            .rev()
            .find_map(|t| match t {
                Token::Action { line, .. } => Some(*line),
                Token::Text(_) => None,
            })
            .unwrap_or(1)
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError {
            line: self.line(),
            message: message.to_string(),
        }
    }

    fn parse_list(&mut self) -> Result<(Vec<Node>, Stop), ParseError> {
        let tokens = self.tokens;
        let mut nodes = Vec::new();
        while let Some(token) = tokens.get(self.pos) {
            self.pos += 1;
            let (line, body) = match token {
                Token::Text(text) => {
                    nodes.push(Node::Text(text.clone()));
                    continue;
                }
                Token::Action { line, body } => (*line, body),
            };

            let words = split_words(body, line)?;
            if let [Word::Bare(var), Word::Declare, rest @ ..] = words.as_slice() {
                let name = variable_name(var).ok_or_else(|| self.error("bad variable"))?;
                nodes.push(Node::Declare {
                    line,
                    name,
                    pipeline: parse_pipeline(rest, line)?,
                });
                continue;
            }
            let Some(Word::Bare(keyword)) = words.first() else {
                nodes.push(Node::Print {
                    line,
                    pipeline: parse_pipeline(&words, line)?,
                });
                continue;
            };

            match keyword.as_str() {
                "end" if words.len() == 1 => return Ok((nodes, Stop::End)),
                "else" if words.len() == 1 => return Ok((nodes, Stop::Else)),
                "else" => {
                    if words.get(1) != Some(&Word::Bare("if".to_string())) {
                        return Err(self.error("expected {{else}} or {{else if}}"));
                    }
                    let pipeline = parse_pipeline(&words[2..], line)?;
                    return Ok((nodes, Stop::ElseIf(pipeline)));
                }
                "end" => return Err(self.error("unexpected words after end")),
                "if" => {
                    let cond = parse_pipeline(&words[1..], line)?;
                    nodes.push(self.parse_if(line, cond)?);
                }
                "range" => {
                    let (vars, rest) = split_declaration(&words[1..], line)?;
                    let pipeline = parse_pipeline(rest, line)?;
                    let (body, otherwise) = self.parse_body("range")?;
                    nodes.push(Node::Range {
                        line,
                        vars,
                        pipeline,
                        body,
                        otherwise,
                    });
                }
                "with" => {
                    let pipeline = parse_pipeline(&words[1..], line)?;
                    let (body, otherwise) = self.parse_body("with")?;
                    nodes.push(Node::With {
                        line,
                        pipeline,
                        body,
                        otherwise,
                    });
                }
                _ => nodes.push(Node::Print {
                    line,
                    pipeline: parse_pipeline(&words, line)?,
                }),
            }
        }
        Ok((nodes, Stop::Eof))
    }

    fn parse_if(&mut self, line: usize, cond: Pipeline) -> Result<Node, ParseError> {
        let mut branches = Vec::new();
        let mut cond = cond;
        loop {
            let (body, stop) = self.parse_list()?;
            branches.push((cond, body));
            match stop {
                Stop::End => {
                    return Ok(Node::If {
                        line,
                        branches,
                        otherwise: Vec::new(),
                    });
                }
                Stop::Else => {
                    let otherwise = self.parse_else_tail("if")?;
                    return Ok(Node::If {
                        line,
                        branches,
                        otherwise,
                    });
                }
                Stop::ElseIf(next) => cond = next,
                Stop::Eof => return Err(self.error("unexpected EOF in if")),
            }
        }
    }

    fn parse_body(&mut self, context: &str) -> Result<(Vec<Node>, Vec<Node>), ParseError> {
        let (body, stop) = self.parse_list()?;
        match stop {
            Stop::End => Ok((body, Vec::new())),
            Stop::Else => Ok((body, self.parse_else_tail(context)?)),
            Stop::ElseIf(_) => Err(self.error(&format!("else if inside {context}"))),
            Stop::Eof => Err(self.error(&format!("unexpected EOF in {context}"))),
        }
    }

    fn parse_else_tail(&mut self, context: &str) -> Result<Vec<Node>, ParseError> {
        let (otherwise, stop) = self.parse_list()?;
        match stop {
            Stop::End => Ok(otherwise),
            Stop::Eof => Err(self.error(&format!("unexpected EOF in {context}"))),
            Stop::Else | Stop::ElseIf(_) => {
                Err(self.error(&format!("expected end; found else in {context}")))
            }
        }
    }
}

fn split_declaration(words: &[Word], line: usize) -> Result<(Vec<String>, &[Word]), ParseError> {
    let Some(decl) = words.iter().position(|w| *w == Word::Declare) else {
        return Ok((Vec::new(), words));
    };
    let err = |message: &str| ParseError {
        line,
        message: message.to_string(),
    };
    let vars = match &words[..decl] {
        [Word::Bare(elem)] => vec![variable_name(elem).ok_or_else(|| err("bad variable"))?],
        [Word::Bare(index), Word::Comma, Word::Bare(elem)] => vec![
            variable_name(index).ok_or_else(|| err("bad variable"))?,
            variable_name(elem).ok_or_else(|| err("bad variable"))?,
        ],
        _ => return Err(err("malformed range declaration")),
    };
    Ok((vars, &words[decl + 1..]))
}

fn variable_name(word: &str) -> Option<String> {
    let name = word.strip_prefix('$')?;
    (!name.is_empty() && !name.contains('.')).then(|| name.to_string())
}

fn parse_pipeline(words: &[Word], line: usize) -> Result<Pipeline, ParseError> {
    let err = |message: String| ParseError { line, message };
    let mut commands = Vec::new();
    for stage in words.split(|w| *w == Word::Pipe) {
        let Some((head, args)) = stage.split_first() else {
            return Err(err("missing command".to_string()));
        };
        let command = match head {
            Word::Bare(name) if is_identifier(name) && !matches!(name.as_str(), "true" | "false") => {
                Command::Call {
                    name: name.clone(),
                    args: args
                        .iter()
                        .map(|w| parse_operand(w, line))
                        .collect::<Result<_, _>>()?,
                }
            }
            _ if !args.is_empty() => {
                return Err(err("can't give argument to non-function".to_string()));
            }
            _ => Command::Operand(parse_operand(head, line)?),
        };
        commands.push(command);
    }
    if commands.is_empty() {
        return Err(err("missing value for command".to_string()));
    }
    Ok(Pipeline { commands })
}

fn is_identifier(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && word.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn parse_operand(word: &Word, line: usize) -> Result<Operand, ParseError> {
    let err = |message: String| ParseError { line, message };
    let bare = match word {
        Word::Str(s) => return Ok(Operand::Str(s.clone())),
        Word::Bare(bare) => bare.as_str(),
        Word::Pipe | Word::Comma | Word::Declare => {
            return Err(err("unexpected punctuation in operand".to_string()));
        }
    };

    if bare == "." {
        return Ok(Operand::Field(Vec::new()));
    }
    if let Some(chain) = bare.strip_prefix('.') {
        return Ok(Operand::Field(field_chain(chain, line)?));
    }
    if let Some(var) = bare.strip_prefix('$') {
        let (name, path) = match var.split_once('.') {
            Some((name, chain)) => (name, field_chain(chain, line)?),
            None => (var, Vec::new()),
        };
        return Ok(Operand::Variable {
            name: name.to_string(),
            path,
        });
    }
    match bare {
        "true" => Ok(Operand::Bool(true)),
        "false" => Ok(Operand::Bool(false)),
        _ => bare
            .parse()
            .map(Operand::Int)
            .map_err(|_| err(format!("unexpected \"{bare}\" in operand"))),
    }
}

fn field_chain(chain: &str, line: usize) -> Result<Vec<String>, ParseError> {
    chain
        .split('.')
        .map(|field| {
            if is_identifier(field) {
                Ok(field.to_string())
            } else {
                Err(ParseError {
                    line,
                    message: format!("bad field name \"{field}\""),
                })
            }
        })
        .collect()
}
