use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "employee_id": "EMP-001",
        "full_name": "Jane Doe",
        "email": "jane@company.com",
        "department": "Engineering"
    })
)]
pub struct Employee {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "Jane Doe")]
    pub full_name: String,

    #[schema(example = "jane@company.com", format = "email")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,
}

/// Raw operator input for the "Add Employee" form. Nothing is checked yet.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct EmployeeForm {
    #[serde(default)]
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[serde(default)]
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[serde(default)]
    #[schema(example = "jane@company.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "Engineering")]
    pub department: String,
}
