//! Element selectors in WebdriverIO's `strategy:value` notation.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Selector parse errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// No known strategy prefix.
    #[error("Unsupported selector: {0}")]
    Unsupported(String),

    /// Strategy given without a value.
    #[error("Selector has an empty value: {0}")]
    Empty(String),
}

/// W3C / Appium locator strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Android resource ID.
    Id,
    /// `UiSelector` expression.
    AndroidUiAutomator,
    /// Content description.
    AccessibilityId,
    /// XPath expression.
    XPath,
}

impl Strategy {
    /// All strategies, longest prefix first so that parsing is unambiguous.
    const ALL: [Self; 4] = [
        Self::AndroidUiAutomator,
        Self::AccessibilityId,
        Self::XPath,
        Self::Id,
    ];

    /// Value for the `using` field of a find-element request.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::AndroidUiAutomator => "-android uiautomator",
            Self::AccessibilityId => "accessibility id",
            Self::XPath => "xpath",
        }
    }
}

/// A locator: strategy plus value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Locator strategy.
    pub strategy: Strategy,
    /// Locator value.
    pub value: String,
}

impl Selector {
    /// Android resource-ID selector.
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Id,
            value: value.into(),
        }
    }

    /// Accessibility-ID selector.
    #[must_use]
    pub fn accessibility_id(value: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::AccessibilityId,
            value: value.into(),
        }
    }

    /// `UiSelector` matching an exact text.
    #[must_use]
    pub fn text(text: &str) -> Self {
        Self {
            strategy: Strategy::AndroidUiAutomator,
            value: format!("new UiSelector().text(\"{text}\")"),
        }
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    /// Parse `id:com.app:id/button` style strings. The strategy ends at the
    /// first `:`, so values may themselves contain colons.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for strategy in Strategy::ALL {
            let Some(value) = s
                .strip_prefix(strategy.as_str())
                .and_then(|rest| rest.strip_prefix(':'))
            else {
                continue;
            };
            if value.is_empty() {
                return Err(SelectorError::Empty(s.to_string()));
            }
            return Ok(Self {
                strategy,
                value: value.to_string(),
            });
        }
        Err(SelectorError::Unsupported(s.to_string()))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.strategy.as_str(), self.value)
    }
}
