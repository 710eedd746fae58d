//! Recognized-macro configuration: which identifiers the declaration parser treats as
//! class/enum/function/property/custom annotations.
/// The set of macro names the parser recognizes as annotations, and how each attaches to
/// the declaration that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroConfig {
    pub class_macro: String,
    pub enum_macro: String,
    pub property_macro: String,
    pub function_macros: Vec<String>,
    pub custom_macros: Vec<String>,
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            class_macro: "CLASS".to_string(),
            enum_macro: "ENUM".to_string(),
            property_macro: "PROPERTY".to_string(),
            function_macros: vec!["FUNCTION".to_string()],
            custom_macros: Vec::new(),
        }
    }
}

impl MacroConfig {
    pub fn is_function_macro(&self, name: &str) -> bool {
        self.function_macros.iter().any(|m| m == name)
    }

    pub fn is_custom_macro(&self, name: &str) -> bool {
        self.custom_macros.iter().any(|m| m == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_names() {
        let config = MacroConfig::default();
        assert_eq!(config.class_macro, "CLASS");
        assert_eq!(config.enum_macro, "ENUM");
        assert_eq!(config.property_macro, "PROPERTY");
        assert!(config.is_function_macro("FUNCTION"));
        assert!(!config.is_custom_macro("ANYTHING"));
    }
}
