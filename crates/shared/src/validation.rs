use crate::constants::*;

pub fn validate_room_id(room: &str) -> Result<(), String> {
    if room.is_empty() {
        return Err("Room id is required".into());
    }
    if room.len() > MAX_ROOM_ID_LENGTH {
        return Err(format!(
            "Room id must be at most {} characters",
            MAX_ROOM_ID_LENGTH
        ));
    }
    if !room
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(
            "Room id can only contain letters, numbers, dots, hyphens, and underscores".into(),
        );
    }
    Ok(())
}

pub fn validate_message_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Message content is required".into());
    }
    if content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err("Message too long".into());
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), String> {
    if username.len() < MIN_USERNAME_LENGTH {
        return Err(format!(
            "Username must be at least {} characters",
            MIN_USERNAME_LENGTH
        ));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LENGTH
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(
            "Username can only contain letters, numbers, hyphens, and underscores".into(),
        );
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    Ok(())
}
