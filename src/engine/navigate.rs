/// Pick the item to select after `removed` leaves the list. Must be called
/// with the pre-removal ordering: the following id wins, the preceding one
/// when the removed item was last, nothing when the id is absent or the
/// list is about to empty out.
pub fn next_after_removal(ids: &[String], removed: &str) -> Option<String> {
    if ids.len() <= 1 {
        return None;
    }
    let pos = ids.iter().position(|id| id == removed)?;
    if pos + 1 < ids.len() {
        Some(ids[pos + 1].clone())
    } else {
        Some(ids[pos - 1].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn middle_removal_selects_following() {
        assert_eq!(
            next_after_removal(&ids(&["a", "b", "c"]), "b"),
            Some("c".to_string())
        );
    }

    #[test]
    fn last_removal_selects_preceding() {
        assert_eq!(
            next_after_removal(&ids(&["a", "b", "c"]), "c"),
            Some("b".to_string())
        );
    }

    #[test]
    fn first_removal_selects_following() {
        assert_eq!(
            next_after_removal(&ids(&["a", "b", "c"]), "a"),
            Some("b".to_string())
        );
    }

    #[test]
    fn singleton_list_selects_nothing() {
        assert_eq!(next_after_removal(&ids(&["a"]), "a"), None);
    }

    #[test]
    fn unknown_id_selects_nothing() {
        assert_eq!(next_after_removal(&ids(&["a", "b"]), "z"), None);
    }
}
