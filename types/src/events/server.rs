use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Speaker of a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    /// Transcription of the caller's speech.
    #[default]
    User,
    /// Text of the agent's reply.
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
        }
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    // Anything that is not the user is the agent speaking.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "user" => Role::User,
            _ => Role::Agent,
        })
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // an explicit null is not "user"; only a missing field defaults to the user
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => Role::from_str(&s).map_err(serde::de::Error::custom),
            None => Ok(Role::Agent),
        }
    }
}

/// Conversation status pushed by the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// The user barged in; queued agent audio should be discarded.
    Interrupted,
    Thinking,
    Speaking,
    Listening,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Interrupted => "interrupted",
            Status::Thinking => "thinking",
            Status::Speaking => "speaking",
            Status::Listening => "listening",
            Status::Other(s) => s,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "interrupted" => Status::Interrupted,
            "thinking" => Status::Thinking,
            "speaking" => Status::Speaking,
            "listening" => Status::Listening,
            _ => Status::Other(s.to_string()),
        })
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Status::from_str(&s).map_err(serde::de::Error::custom)
    }
}
