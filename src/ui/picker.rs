use crate::ui::short_model_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub id: String,
    pub label: String,
}

/// Model selector built from the last `/get-models` listing.
#[derive(Debug, Clone, Default)]
pub struct ModelPicker {
    pub items: Vec<PickerItem>,
    loaded: Option<String>,
}

impl ModelPicker {
    pub fn new(models: &[String], loaded: Option<&str>) -> Self {
        let items = models
            .iter()
            .map(|id| PickerItem {
                id: id.clone(),
                label: short_model_name(id).to_string(),
            })
            .collect();
        Self {
            items,
            loaded: loaded.map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_loaded(&self, id: &str) -> bool {
        self.loaded.as_deref() == Some(id)
    }

    /// Resolve a `/load` argument: a 1-based index into the listing, an exact
    /// identifier, or a short name that matches exactly one entry. Anything
    /// else is passed through so the server can judge it.
    pub fn resolve(&self, arg: &str) -> String {
        let arg = arg.trim();
        if let Some(item) = arg
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| self.items.get(index))
        {
            return item.id.clone();
        }

        if self.items.iter().any(|item| item.id == arg) {
            return arg.to_string();
        }

        let mut by_label = self
            .items
            .iter()
            .filter(|item| item.label.eq_ignore_ascii_case(arg));
        if let (Some(item), None) = (by_label.next(), by_label.next()) {
            return item.id.clone();
        }

        arg.to_string()
    }

    /// One line per model, numbered from 1, marking the loaded one.
    pub fn lines(&self) -> Vec<String> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let marker = if self.is_loaded(&item.id) { "*" } else { " " };
                format!("{marker} {:>2}. {}", index + 1, item.id)
            })
            .collect()
    }
}
