use std::collections::HashMap;

use bevy_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

pub const CLASSNAME: &str = "classname";
pub const TARGETNAME: &str = "targetname";
pub const MODEL: &str = "model";
pub const ORIGIN: &str = "origin";
pub const WORLDSPAWN: &str = "worldspawn";

/// How quoted strings are tokenized.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteMode {
  /// Everything up to the next quote, the way the original compile tools read it.
  #[default]
  Legacy,
  /// Additionally decodes `\n`, `\\` and `\"`.
  Escaped,
}

/// One `{ ... }` block. Keys keep the order they appear in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entity {
  properties: Vec<(String, String)>
}

impl Entity {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.properties.iter()
      .find(|(existing, _)| existing == key)
      .map(|(_, value)| value.as_str())
  }

  /// Replaces the value of an existing key in place, otherwise appends.
  pub fn insert(&mut self, key: String, value: String) -> Option<String> {
    if let Some((_, existing)) = self.properties.iter_mut().find(|(existing, _)| *existing == key) {
      return Some(std::mem::replace(existing, value));
    }
    self.properties.push((key, value));
    None
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.properties.iter().map(|(key, value)| (key.as_str(), value.as_str()))
  }

  pub fn len(&self) -> usize {
    self.properties.len()
  }

  pub fn is_empty(&self) -> bool {
    self.properties.is_empty()
  }

  pub fn classname(&self) -> Option<&str> {
    self.get(CLASSNAME)
  }

  pub fn targetname(&self) -> Option<&str> {
    self.get(TARGETNAME)
  }

  /// The brush model referenced by a `model` value of the form `*N`.
  pub fn model_index(&self) -> Option<usize> {
    self.get(MODEL)?.strip_prefix('*')?.parse().ok()
  }

  pub fn origin(&self) -> Option<Vec3> {
    let mut components = self.get(ORIGIN)?.split_whitespace().map(|component| component.parse::<f32>());
    let origin = Vec3::new(components.next()?.ok()?, components.next()?.ok()?, components.next()?.ok()?);
    if components.next().is_some() {
      return None;
    }
    Some(origin)
  }
}

/// Parsed entity lump with lookup indices.
#[derive(Clone, Debug, Default)]
pub struct Entities {
  entities: Vec<Entity>,
  by_classname: HashMap<String, Vec<usize>>,
  by_targetname: HashMap<String, Vec<usize>>,
  by_model: HashMap<usize, Vec<usize>>,
}

impl Entities {
  /// Parses the entity lump. The text ends at the first NUL byte.
  pub fn read(data: &[u8], mode: QuoteMode) -> Result<Entities, ParseError> {
    let end = data.iter().position(|c| *c == 0).unwrap_or(data.len());
    let mut tokenizer = Tokenizer {
      text: &data[..end],
      position: 0,
      mode
    };

    let mut entities = Vec::new();
    while let Some(c) = tokenizer.skip_whitespace() {
      if c != b'{' {
        return Err(ParseError::ExpectedBlockStart { offset: tokenizer.position, found: tokenizer.char_at_position() });
      }
      tokenizer.position += 1;
      entities.push(tokenizer.read_block()?);
    }
    Ok(Self::new(entities))
  }

  pub fn new(entities: Vec<Entity>) -> Self {
    let mut by_classname = HashMap::<String, Vec<usize>>::new();
    let mut by_targetname = HashMap::<String, Vec<usize>>::new();
    let mut by_model = HashMap::<usize, Vec<usize>>::new();
    for (index, entity) in entities.iter().enumerate() {
      if let Some(classname) = entity.classname() {
        by_classname.entry(classname.to_string()).or_default().push(index);
      }
      if let Some(targetname) = entity.targetname() {
        by_targetname.entry(targetname.to_string()).or_default().push(index);
      }
      if let Some(model) = entity.model_index() {
        by_model.entry(model).or_default().push(index);
      }
    }

    Self {
      entities,
      by_classname,
      by_targetname,
      by_model
    }
  }

  pub fn entities(&self) -> &[Entity] {
    &self.entities
  }

  pub fn len(&self) -> usize {
    self.entities.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entities.is_empty()
  }

  pub fn by_classname<'a>(&'a self, classname: &str) -> impl Iterator<Item = &'a Entity> + 'a {
    Self::lookup(&self.entities, self.by_classname.get(classname))
  }

  pub fn by_targetname<'a>(&'a self, targetname: &str) -> impl Iterator<Item = &'a Entity> + 'a {
    Self::lookup(&self.entities, self.by_targetname.get(targetname))
  }

  pub fn by_model(&self, model: usize) -> impl Iterator<Item = &Entity> + '_ {
    Self::lookup(&self.entities, self.by_model.get(&model))
  }

  pub fn world_spawn(&self) -> Option<&Entity> {
    self.by_classname(WORLDSPAWN).next()
  }

  fn lookup<'a>(entities: &'a [Entity], indices: Option<&'a Vec<usize>>) -> impl Iterator<Item = &'a Entity> + 'a {
    indices.into_iter().flatten().map(move |index| &entities[*index])
  }

  /// Serializes back into the lump grammar. `QuoteMode::Legacy` cannot represent quotes inside values.
  pub fn to_text(&self, mode: QuoteMode) -> String {
    let mut text = String::new();
    for entity in &self.entities {
      text.push_str("{\n");
      for (key, value) in entity.iter() {
        push_quoted(&mut text, key, mode);
        text.push(' ');
        push_quoted(&mut text, value, mode);
        text.push('\n');
      }
      text.push_str("}\n");
    }
    text
  }
}

fn push_quoted(text: &mut String, value: &str, mode: QuoteMode) {
  text.push('"');
  match mode {
    QuoteMode::Legacy => text.push_str(value),
    QuoteMode::Escaped => {
      for c in value.chars() {
        match c {
          '\n' => text.push_str("\\n"),
          '\\' => text.push_str("\\\\"),
          '"' => text.push_str("\\\""),
          c => text.push(c),
        }
      }
    }
  }
  text.push('"');
}

struct Tokenizer<'a> {
  text: &'a [u8],
  position: usize,
  mode: QuoteMode,
}

impl<'a> Tokenizer<'a> {
  /// Decodes the character starting at `position`, invalid UTF-8 becomes U+FFFD.
  fn char_at_position(&self) -> char {
    let end = (self.position + 4).min(self.text.len());
    String::from_utf8_lossy(&self.text[self.position..end])
      .chars()
      .next()
      .unwrap_or(char::REPLACEMENT_CHARACTER)
  }

  /// Skips whitespace and `//` comments, returns the next significant byte.
  fn skip_whitespace(&mut self) -> Option<u8> {
    loop {
      let c = *self.text.get(self.position)?;
      if c.is_ascii_whitespace() {
        self.position += 1;
      } else if c == b'/' && self.text.get(self.position + 1) == Some(&b'/') {
        while self.text.get(self.position).is_some_and(|c| *c != b'\n') {
          self.position += 1;
        }
      } else {
        return Some(c);
      }
    }
  }

  fn read_block(&mut self) -> Result<Entity, ParseError> {
    let mut entity = Entity::new();
    loop {
      match self.skip_whitespace() {
        None => return Err(ParseError::UnexpectedEnd { offset: self.position }),
        Some(b'}') => {
          self.position += 1;
          return Ok(entity);
        }
        Some(b'"') => {
          let key = self.read_string()?;
          match self.skip_whitespace() {
            None => return Err(ParseError::UnexpectedEnd { offset: self.position }),
            Some(b'"') => {}
            Some(_) => return Err(ParseError::UnexpectedCharacter { offset: self.position, found: self.char_at_position(), expected: "a quoted value" }),
          }
          let value = self.read_string()?;
          entity.insert(key, value);
        }
        Some(_) => return Err(ParseError::UnexpectedCharacter { offset: self.position, found: self.char_at_position(), expected: "a quoted key or '}'" }),
      }
    }
  }

  /// Reads a quoted string, `position` must point at the opening quote.
  fn read_string(&mut self) -> Result<String, ParseError> {
    let start = self.position;
    self.position += 1;
    let mut bytes = Vec::<u8>::new();
    loop {
      let Some(&c) = self.text.get(self.position) else {
        return Err(ParseError::UnterminatedString { offset: start });
      };
      self.position += 1;
      match c {
        b'"' => break,
        b'\\' if self.mode == QuoteMode::Escaped => {
          let Some(&escaped) = self.text.get(self.position) else {
            return Err(ParseError::UnterminatedString { offset: start });
          };
          self.position += 1;
          match escaped {
            b'n' => bytes.push(b'\n'),
            b'\\' => bytes.push(b'\\'),
            b'"' => bytes.push(b'"'),
            other => bytes.extend_from_slice(&[b'\\', other]),
          }
        }
        c => bytes.push(c),
      }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
  }
}
