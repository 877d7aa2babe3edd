//! # Access Control
//!
//! Static allow-list of Telegram user ids. An empty list means the bot is
//! open to everyone.

use std::collections::BTreeSet;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while parsing an allow-list
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllowListError {
  #[error("'{0}' is not a numeric user id")]
  InvalidUserId(String),
}

/// Set of user ids permitted to use the bot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
  users: BTreeSet<i64>,
}

impl AllowList {
  /// An allow-list that admits everyone
  pub fn open() -> Self {
    Self::default()
  }

  /// Whether the list is empty and therefore admits everyone
  pub fn is_open(&self) -> bool {
    self.users.is_empty()
  }

  /// Number of listed users
  pub fn len(&self) -> usize {
    self.users.len()
  }

  /// Whether no users are listed
  pub fn is_empty(&self) -> bool {
    self.users.is_empty()
  }

  /// Whether the id is explicitly listed
  pub fn contains(&self, user_id: i64) -> bool {
    self.users.contains(&user_id)
  }
}

impl FromIterator<i64> for AllowList {
  fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
    Self {
      users: iter.into_iter().collect(),
    }
  }
}

impl FromStr for AllowList {
  type Err = AllowListError;

  /// Parse a comma-separated list such as `"123, 456"`. Blank entries are
  /// skipped; anything else that is not an integer is rejected.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.split(',')
      .map(str::trim)
      .filter(|entry| !entry.is_empty())
      .map(|entry| {
        entry
          .parse::<i64>()
          .map_err(|_| AllowListError::InvalidUserId(entry.to_string()))
      })
      .collect()
  }
}

/// Decide whether `user_id` may use the bot
pub fn is_allowed(user_id: i64, allowed: &AllowList) -> bool {
  allowed.is_open() || allowed.contains(user_id)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_open_list_allows_everyone() {
    let list = AllowList::open();
    assert!(is_allowed(1, &list));
    assert!(is_allowed(-42, &list));
    assert!(is_allowed(i64::MAX, &list));
  }

  #[test]
  fn test_restricted_list_is_membership() {
    let list: AllowList = [123, 456].into_iter().collect();
    assert!(is_allowed(123, &list));
    assert!(is_allowed(456, &list));
    assert!(!is_allowed(789, &list));
  }

  #[test]
  fn test_allowed_iff_open_or_member() {
    let lists: Vec<AllowList> = vec![
      AllowList::open(),
      [1].into_iter().collect(),
      [1, 2, 3].into_iter().collect(),
      [-5, 7].into_iter().collect(),
    ];
    for list in &lists {
      for user in -6..=8 {
        assert_eq!(is_allowed(user, list), list.is_empty() || list.contains(user));
      }
    }
  }

  #[test]
  fn test_parse_allow_list() {
    let list: AllowList = "123, 456 ,,789,".parse().unwrap();
    assert_eq!(list.len(), 3);
    assert!(list.contains(456));

    let empty: AllowList = "  ".parse().unwrap();
    assert!(empty.is_open());
  }

  #[test]
  fn test_parse_allow_list_rejects_non_numeric() {
    assert_eq!(
      "123,alice".parse::<AllowList>(),
      Err(AllowListError::InvalidUserId("alice".to_string()))
    );
  }
}
