use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use sqlx::MySqlPool;

use crate::error::{AppError, AppResult};

/// Roles that can be held by members to grant access to committee pages
#[derive(Clone, Copy, Debug, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Member,
    Committee,
    Administrator,
}

impl Role {
    /// Whether a member holding this role passes a gate requiring `required`.
    /// Administrators pass every gate.
    pub fn satisfies(self, required: Role) -> bool {
        self == Role::Administrator || self == required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Member => "member",
            Role::Committee => "committee",
            Role::Administrator => "administrator",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Role::Member),
            "committee" => Ok(Role::Committee),
            "administrator" => Ok(Role::Administrator),
            other => Err(AppError::BadRequest(format!("Unknown role {}", other))),
        }
    }
}

#[derive(Clone, sqlx::FromRow)]
pub struct Member {
    /// The member's email, which must be unique
    pub email: String,
    /// The member's first name
    pub first_name: String,
    /// The member's last name
    pub last_name: String,
    /// Allergies, injuries, anything a coach should know about
    pub medical_info: String,
    /// The member's role, which gates the committee pages
    pub role: Role,

    pub pass_hash: String,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the member can see the committee pages.
    pub fn is_committee(&self) -> bool {
        self.role.satisfies(Role::Committee)
    }

    /// Errors with 403 unless the member's role satisfies the required one.
    pub fn require(&self, role: Role) -> AppResult<()> {
        if self.role.satisfies(role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(role))
        }
    }

    /// Compares a supplied password against the stored hash. A `false` here
    /// and an unknown email both surface as the same generic login failure.
    pub fn verify_password(&self, password: &str) -> AppResult<bool> {
        bcrypt::verify(password, &self.pass_hash).map_err(Into::into)
    }

    pub async fn with_email(email: &str, pool: &MySqlPool) -> AppResult<Member> {
        Self::with_email_opt(email, pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No member with email {}", email)))
    }

    pub async fn with_email_opt(email: &str, pool: &MySqlPool) -> AppResult<Option<Member>> {
        sqlx::query_as(
            "SELECT email, first_name, last_name, medical_info, role, pass_hash
             FROM member WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn all(pool: &MySqlPool) -> AppResult<Vec<Self>> {
        sqlx::query_as(
            "SELECT email, first_name, last_name, medical_info, role, pass_hash
             FROM member ORDER BY last_name, first_name",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Creates a new member with the default role. Everyone starts as a plain
    /// member; the committee promotes from `/members`.
    pub async fn register(new_member: NewMember, pool: &MySqlPool) -> AppResult<()> {
        if Self::with_email_opt(&new_member.email, pool).await?.is_some() {
            return Err(AppError::BadRequest(format!(
                "Another member already has the email {}",
                new_member.email
            )));
        }

        let pass_hash = bcrypt::hash(&new_member.password, 10)?;

        sqlx::query(
            "INSERT INTO member (email, pass_hash, first_name, last_name, medical_info, role)
             VALUES (?, ?, ?, ?, ?, 'member')",
        )
        .bind(&new_member.email)
        .bind(&pass_hash)
        .bind(&new_member.first_name)
        .bind(&new_member.last_name)
        .bind(&new_member.medical_info)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn set_password(email: &str, password: &str, pool: &MySqlPool) -> AppResult<()> {
        let pass_hash = bcrypt::hash(password, 10)?;

        sqlx::query("UPDATE member SET pass_hash = ? WHERE email = ?")
            .bind(&pass_hash)
            .bind(email)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn set_role(email: &str, role: Role, pool: &MySqlPool) -> AppResult<()> {
        sqlx::query("UPDATE member SET role = ? WHERE email = ?")
            .bind(role)
            .bind(email)
            .execute(pool)
            .await?;

        Ok(())
    }
}

#[derive(Deserialize)]
pub struct NewMember {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub medical_info: String,
}

#[cfg(test)]
mod tests {
    use crate::tests::mock::mock_member;

    use super::*;

    #[test]
    fn administrator_passes_every_gate() {
        assert!(Role::Administrator.satisfies(Role::Member));
        assert!(Role::Administrator.satisfies(Role::Committee));
        assert!(Role::Administrator.satisfies(Role::Administrator));
    }

    #[test]
    fn member_fails_the_committee_gate() {
        assert!(!Role::Member.satisfies(Role::Committee));
        assert!(Role::Committee.satisfies(Role::Committee));
        assert!(Role::Member.satisfies(Role::Member));
        assert!(!Role::Committee.satisfies(Role::Administrator));
    }

    #[test]
    fn require_returns_forbidden_for_the_wrong_role() {
        let member = mock_member();
        assert!(member.require(Role::Member).is_ok());
        assert!(matches!(
            member.require(Role::Committee),
            Err(AppError::Forbidden(Role::Committee))
        ));
    }

    #[test]
    fn wrong_password_fails_verification() {
        let mut member = mock_member();
        member.pass_hash = bcrypt::hash("osoto-gari", 4).unwrap();

        assert!(member.verify_password("osoto-gari").unwrap());
        assert!(!member.verify_password("seoi-nage").unwrap());
    }

    #[test]
    fn unknown_roles_are_rejected() {
        assert_eq!("committee".parse::<Role>().unwrap(), Role::Committee);
        assert!("president".parse::<Role>().is_err());
    }
}
