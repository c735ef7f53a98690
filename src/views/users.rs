//! Users page

use crate::client::{User, UserStatus};

/// Active/inactive breakdown over all users
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

/// Users shown on the users page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsersPage {
    pub users: Vec<User>,
}

impl UsersPage {
    /// Remote users followed by locally stored ones the remote doesn't know
    pub fn new(remote: Vec<User>, local: Vec<User>) -> Self {
        let mut users = remote;
        for user in local {
            let known = users
                .iter()
                .any(|u| u.email.eq_ignore_ascii_case(&user.email));
            if !known {
                users.push(user);
            }
        }
        Self { users }
    }

    pub fn filter(&self, search: &str) -> Vec<&User> {
        filter_users(&self.users, search)
    }

    pub fn status_counts(&self) -> StatusCounts {
        let active = self
            .users
            .iter()
            .filter(|u| u.status == UserStatus::Active)
            .count();
        let inactive = self
            .users
            .iter()
            .filter(|u| u.status == UserStatus::Inactive)
            .count();
        StatusCounts {
            total: self.users.len(),
            active,
            inactive,
        }
    }
}

/// Case-insensitive substring match on name OR email
pub fn filter_users<'a>(users: &'a [User], search: &str) -> Vec<&'a User> {
    let needle = search.trim().to_lowercase();
    users
        .iter()
        .filter(|u| {
            needle.is_empty()
                || u.name.to_lowercase().contains(&needle)
                || u.email.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_users, user};

    #[test]
    fn test_filter_matches_name_or_email() {
        let users = sample_users();

        let by_name: Vec<_> = filter_users(&users, "ALICE").iter().map(|u| u.id.to_string()).collect();
        assert_eq!(by_name, vec!["1"]);

        let by_email: Vec<_> = filter_users(&users, "shop.io").iter().map(|u| u.id.to_string()).collect();
        assert_eq!(by_email, vec!["3"]);

        assert_eq!(filter_users(&users, "").len(), 3);
        assert!(filter_users(&users, "zzz").is_empty());
        assert_eq!(filter_users(&users, "  shop.io ").len(), by_email.len());
    }

    #[test]
    fn test_status_counts() {
        let page = UsersPage::new(sample_users(), Vec::new());
        assert_eq!(
            page.status_counts(),
            StatusCounts {
                total: 3,
                active: 2,
                inactive: 1
            }
        );
    }

    #[test]
    fn test_local_users_appended_without_duplicates() {
        let local = vec![
            user(90, "Alice Again", "ALICE@example.com", UserStatus::Inactive),
            user(91, "Dan Local", "dan@example.com", UserStatus::Active),
        ];
        let page = UsersPage::new(sample_users(), local);

        assert_eq!(page.users.len(), 4);
        assert_eq!(page.users[3].email, "dan@example.com");
        assert_eq!(page.filter("dan").len(), 1);
    }
}
