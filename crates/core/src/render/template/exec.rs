//! Template execution.
//!
//! Walks the parsed node tree against a JSON value. Printing and truthiness follow
//! Go's `text/template` conventions so existing testbench templates render the same:
//! missing keys print `<no value>`, sequences print as `[a b]`, and empty values
//! (false, 0, "", null, empty collections) are false.

use serde_json::{Map, Value};

use super::parser::{Command, Node, Operand, Pipeline};
use crate::render::escape::replace_dots;

type ExecResult<T> = Result<T, String>;

/// Executes `nodes` with `root` as both dot and `$`, appending to `out`.
pub fn execute(nodes: &[Node], root: &Value, out: &mut String) -> ExecResult<()> {
    let mut exec = Exec {
        out,
        vars: vec![(String::new(), root.clone())],
    };
    exec.walk(nodes, root)
}

struct Exec<'o> {
    out: &'o mut String,
    vars: Vec<(String, Value)>,
}

impl Exec<'_> {
    fn walk(&mut self, nodes: &[Node], dot: &Value) -> ExecResult<()> {
        let scope = self.vars.len();
        for node in nodes {
            match node {
                Node::Text(text) => self.out.push_str(text),
                Node::Print { line, pipeline } => {
                    let value = self.eval_pipeline(pipeline, dot).map_err(at(*line))?;
                    print_value(&value, self.out);
                }
                Node::Declare {
                    line,
                    name,
                    pipeline,
                } => {
                    let value = self.eval_pipeline(pipeline, dot).map_err(at(*line))?;
                    self.vars.push((name.clone(), value));
                }
                Node::If {
                    line,
                    branches,
                    otherwise,
                } => {
                    let mut taken = None;
                    for (cond, body) in branches {
                        if is_true(&self.eval_pipeline(cond, dot).map_err(at(*line))?) {
                            taken = Some(body);
                            break;
                        }
                    }
                    self.walk(taken.unwrap_or(otherwise), dot)?;
                }
                Node::With {
                    line,
                    pipeline,
                    body,
                    otherwise,
                } => {
                    let value = self.eval_pipeline(pipeline, dot).map_err(at(*line))?;
                    if is_true(&value) {
                        self.walk(body, &value)?;
                    } else {
                        self.walk(otherwise, dot)?;
                    }
                }
                Node::Range {
                    line,
                    vars,
                    pipeline,
                    body,
                    otherwise,
                } => {
                    let value = self.eval_pipeline(pipeline, dot).map_err(at(*line))?;
                    let items: Vec<(Value, Value)> = match value {
                        Value::Array(items) => items
                            .into_iter()
                            .enumerate()
                            .map(|(i, v)| (Value::from(i), v))
                            .collect(),
                        Value::Object(map) => map
                            .into_iter()
                            .map(|(k, v)| (Value::String(k), v))
                            .collect(),
                        Value::Null => Vec::new(),
                        other => {
                            return Err(format!(
                                "line {line}: range can't iterate over {}",
                                kind(&other)
                            ));
                        }
                    };
                    if items.is_empty() {
                        self.walk(otherwise, dot)?;
                        continue;
                    }
                    let depth = self.vars.len();
                    for (key, item) in items {
                        self.vars.truncate(depth);
                        match vars.as_slice() {
                            [elem] => self.vars.push((elem.clone(), item.clone())),
                            [index, elem] => {
                                self.vars.push((index.clone(), key));
                                self.vars.push((elem.clone(), item.clone()));
                            }
                            _ => {}
                        }
                        self.walk(body, &item)?;
                    }
                    self.vars.truncate(depth);
                }
            }
        }
        self.vars.truncate(scope);
        Ok(())
    }

    fn eval_pipeline(&self, pipeline: &Pipeline, dot: &Value) -> ExecResult<Value> {
        let mut carried: Option<Value> = None;
        for command in &pipeline.commands {
            let value = match command {
                Command::Operand(operand) => {
                    if carried.is_some() {
                        return Err("can't pipe a value into a non-function".to_string());
                    }
                    self.eval_operand(operand, dot)?
                }
                Command::Call { name, args } => {
                    let mut values = args
                        .iter()
                        .map(|arg| self.eval_operand(arg, dot))
                        .collect::<ExecResult<Vec<_>>>()?;
                    values.extend(carried.take());
                    call(name, &values)?
                }
            };
            carried = Some(value);
        }
        carried.ok_or_else(|| "empty pipeline".to_string())
    }

    fn eval_operand(&self, operand: &Operand, dot: &Value) -> ExecResult<Value> {
        match operand {
            Operand::Field(path) => lookup(dot, path),
            Operand::Variable { name, path } => {
                let (_, value) = self
                    .vars
                    .iter()
                    .rev()
                    .find(|(var, _)| var == name)
                    .ok_or_else(|| format!("undefined variable \"${name}\""))?;
                lookup(value, path)
            }
            Operand::Str(s) => Ok(Value::String(s.clone())),
            Operand::Int(n) => Ok(Value::from(*n)),
            Operand::Bool(b) => Ok(Value::Bool(*b)),
        }
    }
}

fn at(line: usize) -> impl Fn(String) -> String {
    move |message| format!("line {line}: {message}")
}

static NO_VALUE: Value = Value::Null;

// A missing key yields nil, as Go map lookups do; selecting below nil is an error.
fn lookup(value: &Value, path: &[String]) -> ExecResult<Value> {
    let mut current = value;
    for field in path {
        current = match current {
            Value::Object(map) => map.get(field).unwrap_or(&NO_VALUE),
            Value::Null => return Err(format!("nil value evaluating field .{field}")),
            other => {
                return Err(format!(
                    "can't evaluate field {field} in type {}",
                    kind(other)
                ));
            }
        };
    }
    Ok(current.clone())
}

fn call(name: &str, args: &[Value]) -> ExecResult<Value> {
    let arity = |n: usize| {
        if args.len() == n {
            Ok(())
        } else {
            Err(format!(
                "wrong number of args for {name}: want {n} got {}",
                args.len()
            ))
        }
    };
    match name {
        "replaceDots" => {
            arity(2)?;
            match (&args[0], &args[1]) {
                (Value::String(module), Value::String(signal)) => {
                    Ok(Value::String(replace_dots(module, signal)))
                }
                _ => Err("replaceDots: expect strings for module name and input".to_string()),
            }
        }
        "index" => {
            let (first, keys) = args
                .split_first()
                .ok_or_else(|| "index: missing collection".to_string())?;
            keys.iter().try_fold(first.clone(), |acc, key| index(&acc, key))
        }
        "len" => {
            arity(1)?;
            let len = match &args[0] {
                Value::Array(items) => items.len(),
                Value::Object(map) => map.len(),
                Value::String(s) => s.len(),
                other => return Err(format!("len of type {}", kind(other))),
            };
            Ok(Value::from(len))
        }
        "hex" => {
            arity(1)?;
            args[0]
                .as_u64()
                .map(|n| Value::String(format!("{n:x}")))
                .ok_or_else(|| format!("hex: expected unsigned integer, got {}", kind(&args[0])))
        }
        "eq" => {
            arity(2)?;
            Ok(Value::Bool(args[0] == args[1]))
        }
        "ne" => {
            arity(2)?;
            Ok(Value::Bool(args[0] != args[1]))
        }
        "not" => {
            arity(1)?;
            Ok(Value::Bool(!is_true(&args[0])))
        }
        _ => Err(format!("function \"{name}\" not defined")),
    }
}

fn index(collection: &Value, key: &Value) -> ExecResult<Value> {
    match (collection, key) {
        (Value::Array(items), Value::Number(n)) => {
            let i = n
                .as_u64()
                .ok_or_else(|| format!("index: bad index {n}"))?;
            items
                .get(i as usize)
                .cloned()
                .ok_or_else(|| format!("index: index out of range: {i}"))
        }
        (Value::Object(map), Value::String(k)) => Ok(map.get(k).cloned().unwrap_or(Value::Null)),
        (Value::Null, _) => Err("index of nil value".to_string()),
        (other, key) => Err(format!(
            "can't index item of type {} with {}",
            kind(other),
            kind(key)
        )),
    }
}

/// Go template truthiness.
pub fn is_true(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Appends `value` formatted the way Go's `fmt.Print` formats the decoded YAML value.
pub fn print_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("<no value>"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                print_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => print_map(map, out),
    }
}

fn print_map(map: &Map<String, Value>, out: &mut String) {
    out.push_str("map[");
    for (i, (key, item)) in map.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(key);
        out.push(':');
        print_value(item, out);
    }
    out.push(']');
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nil",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "slice",
        Value::Object(_) => "map",
    }
}
