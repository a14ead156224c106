use crate::config::{ALL_CATEGORIES_LABEL, SELECT_CATEGORY_LABEL};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn category(name: &str) -> Self {
        SelectOption {
            value: name.to_string(),
            label: name.to_string(),
        }
    }
}

/// A dropdown: its options and the index of the selected one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Select {
    pub options: Vec<SelectOption>,
    pub selected: Option<usize>,
}

impl Select {
    /// Selected value, or `""` when nothing is selected.
    pub fn value(&self) -> &str {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(|o| o.value.as_str())
            .unwrap_or("")
    }

    /// Select the first option carrying `value`. Unknown values leave the
    /// selection unchanged and return false.
    pub fn select_value(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(i) => {
                self.selected = Some(i);
                true
            }
            None => false,
        }
    }

    /// Select `value`, appending it as an option when it is not listed.
    pub fn choose(&mut self, value: &str) {
        if !self.select_value(value) {
            self.options.push(SelectOption::category(value));
            self.selected = Some(self.options.len() - 1);
        }
    }

    fn fill(&mut self, placeholder: Option<&str>, categories: &[String]) {
        self.options.clear();
        if let Some(label) = placeholder {
            self.options.push(SelectOption {
                value: String::new(),
                label: label.to_string(),
            });
        }
        self.options
            .extend(categories.iter().map(|c| SelectOption::category(c)));
        self.selected = placeholder.map(|_| 0);
    }
}

/// The three category dropdowns of the page. A `None` select is not on the
/// page and is skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySelects {
    pub filter: Option<Select>,
    pub add: Option<Select>,
    pub edit: Option<Select>,
}

impl Default for CategorySelects {
    fn default() -> Self {
        CategorySelects {
            filter: Some(Select::default()),
            add: Some(Select::default()),
            edit: Some(Select::default()),
        }
    }
}

impl CategorySelects {
    pub fn populate(&mut self, categories: &[String]) {
        if let Some(filter) = self.filter.as_mut() {
            let current = filter.value().to_string();
            filter.fill(Some(ALL_CATEGORIES_LABEL), categories);
            if !current.is_empty() {
                filter.select_value(&current);
            }
        }
        if let Some(add) = self.add.as_mut() {
            add.fill(Some(SELECT_CATEGORY_LABEL), categories);
        }
        if let Some(edit) = self.edit.as_mut() {
            edit.fill(Some(SELECT_CATEGORY_LABEL), categories);
        }
    }

    /// Reset the add dropdown to its placeholder and the given categories.
    pub fn reset_add(&mut self, categories: &[String]) {
        if let Some(add) = self.add.as_mut() {
            add.fill(Some(SELECT_CATEGORY_LABEL), categories);
        }
    }

    pub fn filter_value(&self) -> &str {
        self.filter.as_ref().map(Select::value).unwrap_or("")
    }
}

fn same_category(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Rebuild the edit dropdown for a post in `post_category`.
///
/// The known category matching it (trimmed, case-insensitive) is selected.
/// Without a match the post's literal category is appended as an extra
/// option and selected, so the form never shows a wrong category.
pub fn select_for_edit(select: &mut Select, categories: &[String], post_category: &str) {
    select.fill(None, categories);
    match categories.iter().position(|c| same_category(c, post_category)) {
        Some(i) => select.selected = Some(i),
        None => select.choose(post_category),
    }
}
