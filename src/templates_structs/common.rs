use askama::Template;

use crate::models::department::Department;
use crate::models::membership::Membership;
use crate::models::team::Team;
use crate::models::user::{ProfileForm, RegisterForm, Role, UserProfile};
use super::PageContext;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub app_name: String,
    pub csrf_token: String,
    pub next: String,
    pub username: String,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub app_name: String,
    pub csrf_token: String,
    pub errors: Vec<String>,
    pub form: RegisterForm,
    pub roles: Vec<Role>,
    pub teams: Vec<Team>,
    pub departments: Vec<Department>,
}

impl RegisterTemplate {
    /// Select-box helpers; askama compares plain strings.
    pub fn team_selected(&self, id: &i64) -> bool {
        self.form.team.trim() == id.to_string()
    }

    pub fn department_selected(&self, id: &i64) -> bool {
        self.form.department.trim() == id.to_string()
    }

    pub fn role_selected(&self, role: &Role) -> bool {
        let chosen = if self.form.role.is_empty() { Role::Engineer.as_str() } else { self.form.role.as_str() };
        chosen == role.as_str()
    }
}

#[derive(Template)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub ctx: PageContext,
    pub profile: UserProfile,
    pub memberships: Vec<Membership>,
    pub profile_form: ProfileForm,
    pub profile_errors: Vec<String>,
    pub password_errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_page_keeps_chosen_team_and_department() {
        let eng = Department { id: 1, name: "Eng".into() };
        let alpha = Team { id: 10, name: "Alpha".into(), department_id: Some(1), department_name: Some("Eng".into()) };
        let beta = Team { id: 11, name: "Beta".into(), department_id: Some(1), department_name: Some("Eng".into()) };
        let page = RegisterTemplate {
            app_name: "Health Check".into(),
            csrf_token: "abc".into(),
            errors: Vec::new(),
            form: RegisterForm { team: "11".into(), department: " 1 ".into(), ..Default::default() },
            roles: Role::ALL.to_vec(),
            teams: vec![alpha, beta],
            departments: vec![eng],
        };

        let html = page.render().unwrap();
        assert!(html.contains(r#"<option value="11" selected>"#));
        assert!(!html.contains(r#"<option value="10" selected>"#));
        assert!(html.contains(r#"<option value="1" selected>Eng</option>"#));
        assert!(html.contains(r#"<option value="engineer" selected>"#));
    }
}
