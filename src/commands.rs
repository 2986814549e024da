//! Entity kind names, aliases and lookup for command-line input

use crate::swapi::EntityKind;

#[derive(Debug, Clone)]
pub struct KindName {
  pub kind: EntityKind,
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All kinds the CLI accepts
pub const KINDS: &[KindName] = &[
  KindName {
    kind: EntityKind::People,
    name: "people",
    aliases: &["p", "person", "character", "characters"],
    description: "Characters",
  },
  KindName {
    kind: EntityKind::Planets,
    name: "planets",
    aliases: &["pl", "planet", "world"],
    description: "Planets",
  },
  KindName {
    kind: EntityKind::Vehicles,
    name: "vehicles",
    aliases: &["v", "vehicle", "ride"],
    description: "Vehicles",
  },
];

/// Get matching kinds for a given input, best match first
pub fn get_suggestions(input: &str) -> Vec<&'static KindName> {
  let input_lower = input.trim().to_lowercase();

  if input_lower.is_empty() {
    return KINDS.iter().collect();
  }

  let mut matches: Vec<(&KindName, u32)> = Vec::new();

  for entry in KINDS {
    // Exact match on name
    if entry.name == input_lower {
      matches.push((entry, 0));
      continue;
    }

    // Exact match on alias
    if entry.aliases.contains(&input_lower.as_str()) {
      matches.push((entry, 1));
      continue;
    }

    // Prefix match on name
    if entry.name.starts_with(&input_lower) {
      matches.push((entry, 2));
      continue;
    }

    // Prefix match on alias
    if entry.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      matches.push((entry, 3));
      continue;
    }

    // Fuzzy match (contains)
    if entry.name.contains(&input_lower) || entry.aliases.iter().any(|a| a.contains(&input_lower)) {
      matches.push((entry, 4));
    }
  }

  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(entry, _)| entry).collect()
}

/// Resolve user input to a kind. Usable as a clap value parser.
pub fn parse_kind(input: &str) -> Result<EntityKind, String> {
  get_suggestions(input)
    .first()
    .filter(|_| !input.trim().is_empty())
    .map(|entry| entry.kind)
    .ok_or_else(|| {
      let names: Vec<&str> = KINDS.iter().map(|k| k.name).collect();
      format!("unknown kind '{}', expected one of: {}", input, names.join(", "))
    })
}
