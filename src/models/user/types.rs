use serde::{Deserialize, Serialize};

/// What a user is in the organisation. Drives both voting rights and the
/// dashboard scope (see `crate::scope`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Engineer,
    TeamLeader,
    DepartmentLeader,
    SeniorManager,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Engineer,
        Role::TeamLeader,
        Role::DepartmentLeader,
        Role::SeniorManager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Engineer => "engineer",
            Role::TeamLeader => "teamLeader",
            Role::DepartmentLeader => "departmentLeader",
            Role::SeniorManager => "seniorManager",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Engineer => "Engineer",
            Role::TeamLeader => "Team Leader",
            Role::DepartmentLeader => "Department Leader",
            Role::SeniorManager => "Senior Manager",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Role::ALL.into_iter().find(|r| r.as_str() == s)
    }

    /// Leadership roles look at results; they do not vote.
    pub fn can_vote(&self) -> bool {
        matches!(self, Role::Engineer | Role::TeamLeader)
    }

    /// Roles that sit in a team rather than above one.
    pub fn is_team_member(&self) -> bool {
        matches!(self, Role::Engineer | Role::TeamLeader)
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::parse(&value).ok_or_else(|| format!("unknown role '{value}'"))
    }
}

/// Internal user struct for authentication — includes password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
}

/// A user with their profile, safe for templates.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserProfile {
    pub user_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// New user data for registration. `team_id` is only set for team roles.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub department_id: Option<i64>,
    pub team_id: Option<i64>,
}

/// Form data from the registration page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub role: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub department: String,
    pub csrf_token: String,
}

/// Form data from the profile section of the account page. Email and
/// role are shown but not editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl ProfileForm {
    pub fn from_profile(profile: &UserProfile) -> Self {
        ProfileForm {
            username: profile.username.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            csrf_token: String::new(),
        }
    }
}
