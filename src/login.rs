use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginTab {
    #[default]
    Password,
    Otp,
}

impl LoginTab {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "password" | "pw" => Some(LoginTab::Password),
            "otp" => Some(LoginTab::Otp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoginTab::Password => "password",
            LoginTab::Otp => "otp",
        }
    }
}

/// Password/OTP tab pair on the login page. Exactly one tab is active and only
/// its form is visible.
#[derive(Debug, Default)]
pub struct LoginTabs {
    active: LoginTab,
}

impl LoginTabs {
    pub fn select(&mut self, tab: LoginTab) {
        self.active = tab;
    }

    pub fn active(&self) -> LoginTab {
        self.active
    }

    pub fn form_visible(&self, tab: LoginTab) -> bool {
        self.active == tab
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "activeTab": self.active().as_str(),
            "passwordFormVisible": self.form_visible(LoginTab::Password),
            "otpFormVisible": self.form_visible(LoginTab::Otp),
        })
    }
}
