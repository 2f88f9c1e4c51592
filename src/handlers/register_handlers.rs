use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::session::{get_user_id, log_in, set_flash};
use crate::auth::{csrf, password, validate};
use crate::config::SiteInfo;
use crate::errors::{AppError, redirect, render};
use crate::models::department::{self, Department};
use crate::models::team::{self, Team};
use crate::models::user::{self, NewUser, RegisterForm, Role};
use crate::templates_structs::RegisterTemplate;

/// Where a new user sits in the organisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub department_id: Option<i64>,
    pub team_id: Option<i64>,
}

/// Apply the role rules to the chosen team and department.
///
/// Team roles need a team (inside the chosen department, if one was
/// chosen). Department leaders need a department and never get a team.
/// Senior managers sit above both.
pub fn place(role: Role, team: Option<&Team>, department: Option<&Department>) -> Result<Placement, String> {
    match role {
        Role::Engineer | Role::TeamLeader => {
            let team = team.ok_or_else(|| format!("A {} must choose a team", role.label()))?;
            if let Some(d) = department
                && team.department_id != Some(d.id)
            {
                return Err(format!("Team {} is not part of {}", team.name, d.name));
            }
            Ok(Placement {
                department_id: department.map(|d| d.id).or(team.department_id),
                team_id: Some(team.id),
            })
        }
        Role::DepartmentLeader => {
            let d = department.ok_or_else(|| "A Department Leader must choose a department".to_string())?;
            Ok(Placement { department_id: Some(d.id), team_id: None })
        }
        Role::SeniorManager => Ok(Placement { department_id: None, team_id: None }),
    }
}

/// Field-level checks that need no database.
pub fn validate_fields(form: &RegisterForm) -> Vec<String> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_username(&form.username));
    errors.extend(validate::validate_required(&form.first_name, "First name", 100));
    errors.extend(validate::validate_required(&form.last_name, "Last name", 100));
    errors.extend(validate::validate_email(&form.email));
    errors.extend(validate::validate_new_password(&form.password, &form.password_confirm));
    if Role::parse(form.role.trim()).is_none() {
        errors.push("Please choose a role".to_string());
    }
    errors
}

async fn render_page(
    pool: &PgPool,
    session: &Session,
    site: &SiteInfo,
    mut form: RegisterForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    form.password.clear();
    form.password_confirm.clear();
    render(RegisterTemplate {
        app_name: site.app_name.clone(),
        csrf_token: csrf::get_or_create_token(session),
        errors,
        form,
        roles: Role::ALL.to_vec(),
        teams: team::find_all(pool).await?,
        departments: department::find_all(pool).await?,
    })
}

pub async fn register_page(
    pool: web::Data<PgPool>,
    site: web::Data<SiteInfo>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    if get_user_id(&session).is_some() {
        return Ok(redirect("/dashboard"));
    }
    render_page(&pool, &session, &site, RegisterForm::default(), Vec::new()).await
}

pub async fn register_submit(
    pool: web::Data<PgPool>,
    site: web::Data<SiteInfo>,
    session: Session,
    form: web::Form<RegisterForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let form = form.into_inner();

    let mut errors = validate_fields(&form);
    if errors.is_empty() && user::username_exists(&pool, &form.username).await? {
        errors.push("That username is already taken".to_string());
    }

    let team = match validate::parse_optional_id(&form.team, "Team") {
        Ok(Some(id)) => {
            let found = team::find_by_id(&pool, id).await?;
            if found.is_none() {
                errors.push("Selected team does not exist".to_string());
            }
            found
        }
        Ok(None) => None,
        Err(e) => {
            errors.push(e);
            None
        }
    };
    let department = match validate::parse_optional_id(&form.department, "Department") {
        Ok(Some(id)) => {
            let found = department::find_by_id(&pool, id).await?;
            if found.is_none() {
                errors.push("Selected department does not exist".to_string());
            }
            found
        }
        Ok(None) => None,
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let Some(role) = Role::parse(form.role.trim()) else {
        return render_page(&pool, &session, &site, form, errors).await;
    };
    let placement = match place(role, team.as_ref(), department.as_ref()) {
        Ok(p) => Some(p),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let Some(placement) = placement.filter(|_| errors.is_empty()) else {
        return render_page(&pool, &session, &site, form, errors).await;
    };

    let new_user = NewUser {
        username: form.username.trim().to_string(),
        password_hash: password::hash_password(&form.password)?,
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email: form.email.trim().to_string(),
        role,
        department_id: placement.department_id,
        team_id: placement.team_id,
    };
    let user_id = user::create(&pool, &new_user).await?;

    log_in(&session, user_id, &new_user.username, role)?;
    set_flash(&session, "Welcome! Your account has been created.");
    Ok(redirect("/dashboard"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eng() -> Department {
        Department { id: 1, name: "Eng".into() }
    }

    fn ops() -> Department {
        Department { id: 2, name: "Ops".into() }
    }

    fn alpha() -> Team {
        Team { id: 10, name: "Alpha".into(), department_id: Some(1), department_name: Some("Eng".into()) }
    }

    fn valid_form() -> RegisterForm {
        RegisterForm {
            username: "ada_l".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "analytical".into(),
            password_confirm: "analytical".into(),
            role: "engineer".into(),
            ..Default::default()
        }
    }

    #[test]
    fn engineer_needs_a_team() {
        assert!(place(Role::Engineer, None, Some(&eng())).is_err());
        let p = place(Role::Engineer, Some(&alpha()), None).unwrap();
        assert_eq!(p, Placement { department_id: Some(1), team_id: Some(10) });
    }

    #[test]
    fn team_must_belong_to_chosen_department() {
        let err = place(Role::TeamLeader, Some(&alpha()), Some(&ops())).unwrap_err();
        assert!(err.contains("Alpha"));
        assert!(place(Role::TeamLeader, Some(&alpha()), Some(&eng())).is_ok());
    }

    #[test]
    fn department_leader_ignores_team() {
        assert!(place(Role::DepartmentLeader, Some(&alpha()), None).is_err());
        let p = place(Role::DepartmentLeader, Some(&alpha()), Some(&ops())).unwrap();
        assert_eq!(p, Placement { department_id: Some(2), team_id: None });
    }

    #[test]
    fn senior_manager_ignores_both() {
        let p = place(Role::SeniorManager, Some(&alpha()), Some(&eng())).unwrap();
        assert_eq!(p, Placement { department_id: None, team_id: None });
    }

    #[test]
    fn field_checks() {
        assert!(validate_fields(&valid_form()).is_empty());

        let mut form = valid_form();
        form.password_confirm = "different".into();
        form.email = "nope".into();
        form.role = "boss".into();
        assert_eq!(validate_fields(&form).len(), 3);
    }
}
