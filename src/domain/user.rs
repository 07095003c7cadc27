use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

pub type UserId = u64;

/// Shown in place of a missing department.
pub const MISSING_DEPARTMENT: &str = "N/A";

/// Represents a managed person as exchanged with the remote collection.
///
/// Seed records from the remote API carry a combined `name` instead of the
/// structured first/last name fields; records created locally carry the
/// structured fields only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl User {
    /// Builds the record a submitted form stands for.
    pub fn from_form(id: UserId, form: &FormState) -> Self {
        Self {
            id,
            first_name: Some(form.first_name.clone()),
            last_name: Some(form.last_name.clone()),
            name: None,
            email: form.email.clone(),
            department: Some(form.department.clone()),
        }
    }

    /// First name, falling back to the first token of the combined `name`.
    pub fn display_first_name(&self) -> &str {
        non_empty(self.first_name.as_deref()).unwrap_or_else(|| self.name_token(0))
    }

    /// Last name, falling back to the second token of the combined `name`.
    pub fn display_last_name(&self) -> &str {
        non_empty(self.last_name.as_deref()).unwrap_or_else(|| self.name_token(1))
    }

    pub fn display_department(&self) -> &str {
        non_empty(self.department.as_deref()).unwrap_or(MISSING_DEPARTMENT)
    }

    fn name_token(&self, index: usize) -> &str {
        self.name
            .as_deref()
            .and_then(|name| name.split(' ').nth(index))
            .unwrap_or("")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// The four controlled inputs of the user form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    FirstName,
    LastName,
    Email,
    Department,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::Email,
        FormField::Department,
    ];

    /// Wire/input name of the field.
    pub fn name(self) -> &'static str {
        match self {
            FormField::FirstName => "firstName",
            FormField::LastName => "lastName",
            FormField::Email => "email",
            FormField::Department => "department",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::FirstName => "First Name",
            FormField::LastName => "Last Name",
            FormField::Email => "Email",
            FormField::Department => "Department",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firstName" | "first" => Ok(FormField::FirstName),
            "lastName" | "last" => Ok(FormField::LastName),
            "email" => Ok(FormField::Email),
            "department" | "dept" => Ok(FormField::Department),
            other => Err(InputError::UnknownField(other.to_string())),
        }
    }
}

/// Values currently held by the form inputs. `id` is `None` for an unsaved user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
}

impl FormState {
    /// Loads an existing user into the form, using the same name fallbacks
    /// the table shows.
    pub fn from_user(user: &User) -> Self {
        Self {
            id: Some(user.id),
            first_name: user.display_first_name().to_string(),
            last_name: user.display_last_name().to_string(),
            email: user.email.clone(),
            department: user.department.clone().unwrap_or_default(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::Email => &self.email,
            FormField::Department => &self.department,
        }
    }

    /// Controlled-input transition: sets one field, leaves the others untouched.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::Email => &mut self.email,
            FormField::Department => &mut self.department,
        };
        *slot = value.into();
    }

    /// Fields that would block submission: every field is required and the
    /// email needs an `@`.
    pub fn invalid_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|&field| {
                let value = self.get(field);
                value.is_empty() || (field == FormField::Email && !value.contains('@'))
            })
            .collect()
    }
}
