//! Input validation helpers

/// Usernames are stored lowercase: 3-32 chars of `[a-z0-9_]`.
pub fn validate_username(username: &str) -> Result<(), &'static str> {
  if username.len() < 3 {
    return Err("Username must be at least 3 characters");
  }
  if username.len() > 32 {
    return Err("Username must be at most 32 characters");
  }
  if !username
    .chars()
    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
  {
    return Err(
      "Username may only contain lowercase letters, digits and underscores",
    );
  }
  Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
  let Some((local, domain)) = email.split_once('@') else {
    return Err("Invalid email format");
  };
  if local.is_empty() || domain.is_empty() || domain.contains('@') {
    return Err("Invalid email format");
  }
  if !domain.contains('.') {
    return Err("Invalid email domain");
  }
  Ok(())
}

pub fn validate_password(password: &str) -> Result<(), &'static str> {
  if password.len() < 8 {
    return Err("Password must be at least 8 characters");
  }
  if password.len() > 128 {
    return Err("Password must be at most 128 characters");
  }
  Ok(())
}
