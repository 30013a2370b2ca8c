/// 미들웨어 인증 모드
#[derive(Debug, Clone, PartialEq)]
pub enum AuthMode {
    /// 토큰이 없거나 잘못되면 401
    Required,
    /// 토큰이 있으면 검증하고, 없으면 익명으로 통과
    Optional,
}

/// 요구 역할
#[derive(Debug, Clone)]
pub enum RequiredRole {
    Single(String),
    Any(Vec<String>),
}

impl RequiredRole {
    pub fn is_satisfied(&self, user_roles: &[String]) -> bool {
        match self {
            RequiredRole::Single(required_role) => user_roles.contains(required_role),
            RequiredRole::Any(required_roles) => {
                required_roles.iter().any(|role| user_roles.contains(role))
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            RequiredRole::Single(role) => role.clone(),
            RequiredRole::Any(roles) => roles.join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_role_satisfaction() {
        let roles = vec!["user".to_string()];

        assert!(RequiredRole::Single("user".to_string()).is_satisfied(&roles));
        assert!(!RequiredRole::Single("admin".to_string()).is_satisfied(&roles));
        assert!(RequiredRole::Any(vec!["admin".to_string(), "user".to_string()]).is_satisfied(&roles));
        assert!(!RequiredRole::Any(vec![]).is_satisfied(&roles));
    }
}
