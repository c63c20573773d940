//! Field type expressions such as `[]*Address` or `map[string]int64`.

use std::{fmt, str::FromStr};

use kodec_ir::Primitive;
use serde::{Deserialize, Deserializer};

use crate::validate::validate_identifier;

/// A parsed field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Primitive(Primitive),
    /// Reference to a key of the `[types]` table.
    Named(String),
    List(Box<TypeExpr>),
    Pointer(Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
}

impl TypeExpr {
    /// Every `[types]` key this expression refers to, outermost first.
    pub fn names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TypeExpr::Primitive(_) => {}
            TypeExpr::Named(name) => out.push(name),
            TypeExpr::List(elem) | TypeExpr::Pointer(elem) => elem.collect_names(out),
            TypeExpr::Map(key, value) => {
                key.collect_names(out);
                value.collect_names(out);
            }
        }
    }
}

impl FromStr for TypeExpr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty type expression".to_string());
        }

        if let Some(elem) = s.strip_prefix("[]") {
            return Ok(TypeExpr::List(Box::new(elem.parse()?)));
        }
        if let Some(elem) = s.strip_prefix('*') {
            return Ok(TypeExpr::Pointer(Box::new(elem.parse()?)));
        }
        if let Some(rest) = s.strip_prefix("map[") {
            let close = closing_bracket(rest).ok_or_else(|| format!("unclosed '[' in '{}'", s))?;
            let key = rest[..close].parse()?;
            let value = rest[close + 1..].parse()?;
            return Ok(TypeExpr::Map(Box::new(key), Box::new(value)));
        }
        if let Ok(primitive) = s.parse::<Primitive>() {
            return Ok(TypeExpr::Primitive(primitive));
        }

        match validate_identifier(s) {
            Some(reason) => Err(format!("invalid type '{}': {}", s, reason)),
            None => Ok(TypeExpr::Named(s.to_string())),
        }
    }
}

/// Index of the `]` closing an already opened `[`.
fn closing_bracket(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Primitive(p) => write!(f, "{}", p),
            TypeExpr::Named(name) => f.write_str(name),
            TypeExpr::List(elem) => write!(f, "[]{}", elem),
            TypeExpr::Pointer(elem) => write!(f, "*{}", elem),
            TypeExpr::Map(key, value) => write!(f, "map[{}]{}", key, value),
        }
    }
}

impl<'de> Deserialize<'de> for TypeExpr {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
