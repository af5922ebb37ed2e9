//! Static access-control table: which roles may open which screen.
//!
//! Handlers check the caller's role here before touching data, and the
//! navigation endpoint builds the menu from the same rows.

use serde::Serialize;

use super::enums::UserRole;
use super::schema::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Dashboard,
    Students,
    Courses,
    Instructors,
    Enrollments,
    Interactions,
    Payments,
    Users,
}

impl From<Resource> for Screen {
    fn from(resource: Resource) -> Self {
        match resource {
            Resource::Students => Screen::Students,
            Resource::Courses => Screen::Courses,
            Resource::Instructors => Screen::Instructors,
            Resource::Enrollments => Screen::Enrollments,
            Resource::Payments => Screen::Payments,
            Resource::Interactions => Screen::Interactions,
            Resource::Users => Screen::Users,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any signed-in user.
    Authenticated,
    Roles(&'static [UserRole]),
}

#[derive(Debug, Clone, Copy)]
pub struct ScreenEntry {
    pub screen: Screen,
    pub label: &'static str,
    pub route: &'static str,
    pub access: Access,
}

/// Menu order is table order.
pub static ACCESS_TABLE: &[ScreenEntry] = &[
    ScreenEntry {
        screen: Screen::Dashboard,
        label: "Dashboard",
        route: "/",
        access: Access::Authenticated,
    },
    ScreenEntry {
        screen: Screen::Students,
        label: "Students",
        route: "/students",
        access: Access::Authenticated,
    },
    ScreenEntry {
        screen: Screen::Courses,
        label: "Courses",
        route: "/courses",
        access: Access::Authenticated,
    },
    ScreenEntry {
        screen: Screen::Instructors,
        label: "Instructors",
        route: "/instructors",
        access: Access::Authenticated,
    },
    ScreenEntry {
        screen: Screen::Enrollments,
        label: "Enrollments",
        route: "/enrollments",
        access: Access::Authenticated,
    },
    ScreenEntry {
        screen: Screen::Interactions,
        label: "Interactions",
        route: "/interactions",
        access: Access::Authenticated,
    },
    ScreenEntry {
        screen: Screen::Payments,
        label: "Payments",
        route: "/payments",
        access: Access::Authenticated,
    },
    ScreenEntry {
        screen: Screen::Users,
        label: "Users",
        route: "/users",
        access: Access::Roles(&[UserRole::Admin]),
    },
];

impl ScreenEntry {
    pub fn allows(&self, role: UserRole) -> bool {
        match self.access {
            Access::Authenticated => true,
            Access::Roles(roles) => roles.contains(&role),
        }
    }
}

/// A screen missing from the table is denied.
pub fn can_access(screen: Screen, role: UserRole) -> bool {
    ACCESS_TABLE
        .iter()
        .find(|entry| entry.screen == screen)
        .is_some_and(|entry| entry.allows(role))
}

pub fn visible_screens(role: UserRole) -> Vec<&'static ScreenEntry> {
    ACCESS_TABLE.iter().filter(|entry| entry.allows(role)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_screen_is_admin_only() {
        assert!(can_access(Screen::Users, UserRole::Admin));
        assert!(!can_access(Screen::Users, UserRole::Staff));
        assert!(!can_access(Screen::Users, UserRole::Instructor));
    }

    #[test]
    fn every_role_sees_the_shared_screens() {
        for role in UserRole::ALL {
            for screen in [Screen::Dashboard, Screen::Students, Screen::Payments] {
                assert!(can_access(screen, *role), "{:?} denied {:?}", role, screen);
            }
        }
    }

    #[test]
    fn menu_follows_table_order() {
        let labels: Vec<_> = visible_screens(UserRole::Staff)
            .iter()
            .map(|entry| entry.label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "Dashboard",
                "Students",
                "Courses",
                "Instructors",
                "Enrollments",
                "Interactions",
                "Payments"
            ]
        );
        assert_eq!(visible_screens(UserRole::Admin).len(), ACCESS_TABLE.len());
    }

    #[test]
    fn every_resource_has_a_row() {
        for resource in Resource::ALL {
            let screen = Screen::from(*resource);
            assert!(ACCESS_TABLE.iter().any(|entry| entry.screen == screen));
        }
    }
}
