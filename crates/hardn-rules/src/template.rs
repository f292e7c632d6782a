//! # Templated Multi-Target Rules
//!
//! A [`TemplateExpansionRule`] stands for `|A| x |B|` single-target rules:
//! a [`PathTemplate`] with two positional `{}` holes is filled with every
//! `(a, b)` pair drawn from two [`Dimension`]s, outer loop over `A`, inner
//! loop over `B`.
//!
//! ## Closed Vocabularies
//!
//! Substitution is plain string splicing with no escaping. That is only sound
//! because dimension elements come from operator-controlled enumerations such
//! as a fixed list of product versions. [`Dimension::new`] still rejects
//! elements that would change the shape of a path (separators, braces) so a
//! typo in a catalog file cannot redirect a write.
//!
//! ## Statelessness
//!
//! Every `apply`, `is_hardened` and `targets` call builds a fresh expansion.
//! Nothing is cached between calls; captured state lives in the journal.

use hardn_core::{Dword, RootScope, RuleTarget, Store, ValidationError};

use crate::error::RuleError;
use crate::rule::{Rule, RuleMeta, Session};
use crate::single::SingleTargetRule;

const HOLE: &str = "{}";

/// A key path with exactly two `{}` holes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
}

impl PathTemplate {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidPathTemplate`] unless there are exactly two
    /// holes, [`ValidationError::InvalidTarget`] if the template starts or
    /// ends with a separator.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let holes = raw.matches(HOLE).count();
        if holes != 2 {
            return Err(ValidationError::InvalidPathTemplate {
                template: raw,
                holes,
            });
        }
        if raw.starts_with('\\') || raw.ends_with('\\') {
            return Err(ValidationError::InvalidTarget(format!(
                "path template \"{raw}\" must not start or end with a separator"
            )));
        }
        Ok(Self { raw })
    }

    /// Fill the first hole with `a` and the second with `b`.
    pub fn fill(&self, a: &str, b: &str) -> String {
        let mut parts = self.raw.splitn(3, HOLE);
        let head = parts.next().unwrap_or_default();
        let middle = parts.next().unwrap_or_default();
        let tail = parts.next().unwrap_or_default();
        let mut path = String::with_capacity(self.raw.len() + a.len() + b.len());
        path.push_str(head);
        path.push_str(a);
        path.push_str(middle);
        path.push_str(b);
        path.push_str(tail);
        path
    }

    /// The template text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// An ordered, duplicate-free, non-empty vocabulary substituted into one hole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    label: &'static str,
    elements: Vec<String>,
}

impl Dimension {
    /// Build a dimension called `label` (used in error messages).
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyDimension`] for an empty vocabulary,
    /// [`ValidationError::InvalidDimensionElement`] for an empty, duplicate,
    /// or path-altering element.
    pub fn new<I, S>(label: &'static str, elements: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let elements: Vec<String> = elements.into_iter().map(Into::into).collect();
        if elements.is_empty() {
            return Err(ValidationError::EmptyDimension(label));
        }
        for (i, value) in elements.iter().enumerate() {
            let reason = if value.is_empty() {
                Some("element is empty")
            } else if value.contains('\\') || value.contains('/') {
                Some("contains a path separator")
            } else if value.contains('{') || value.contains('}') {
                Some("contains a template brace")
            } else if elements[..i].contains(value) {
                Some("duplicate element")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(ValidationError::InvalidDimensionElement {
                    dimension: label,
                    value: value.clone(),
                    reason,
                });
            }
        }
        Ok(Self { label, elements })
    }

    /// The dimension's label.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Elements in declaration order.
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the dimension has no elements. [`Dimension::new`] rejects
    /// empty vocabularies, so this is `false` for every built dimension.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A rule that expands a path template over two dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateExpansionRule {
    meta: RuleMeta,
    scope: RootScope,
    template: PathTemplate,
    dimension_a: Dimension,
    dimension_b: Dimension,
    value_name: String,
    hardened_value: Dword,
}

impl TemplateExpansionRule {
    /// Build a template rule.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidTarget`] if any expanded target would be
    /// invalid (empty value name).
    pub fn new(
        meta: RuleMeta,
        scope: RootScope,
        template: PathTemplate,
        dimension_a: Dimension,
        dimension_b: Dimension,
        value_name: impl Into<String>,
        hardened_value: Dword,
    ) -> Result<Self, ValidationError> {
        let rule = Self {
            meta,
            scope,
            template,
            dimension_a,
            dimension_b,
            value_name: value_name.into(),
            hardened_value,
        };
        for (a, b) in rule.pairs() {
            RuleTarget::new(rule.scope, rule.template.fill(a, b), &rule.value_name)?;
        }
        Ok(rule)
    }

    /// The path template.
    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// The outer dimension.
    pub fn dimension_a(&self) -> &Dimension {
        &self.dimension_a
    }

    /// The inner dimension.
    pub fn dimension_b(&self) -> &Dimension {
        &self.dimension_b
    }

    /// The value written to every expanded target.
    pub fn hardened_value(&self) -> Dword {
        self.hardened_value
    }

    fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.dimension_a.elements.iter().flat_map(move |a| {
            self.dimension_b
                .elements
                .iter()
                .map(move |b| (a.as_str(), b.as_str()))
        })
    }

    /// Expand into fresh single-target rules, outer loop over dimension A.
    ///
    /// Each expanded rule carries this rule's metadata, so failures are
    /// reported under the template's name.
    pub fn expand(&self) -> Vec<SingleTargetRule> {
        self.pairs()
            // Every pair was validated in `new`, so construction cannot fail here.
            .filter_map(|(a, b)| {
                RuleTarget::new(self.scope, self.template.fill(a, b), &self.value_name).ok()
            })
            .map(|target| SingleTargetRule::new(self.meta.clone(), target, self.hardened_value))
            .collect()
    }
}

impl Rule for TemplateExpansionRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn apply(&self, session: &mut Session<'_>, enable: bool) -> Result<(), RuleError> {
        for rule in self.expand() {
            rule.apply(session, enable)?;
        }
        Ok(())
    }

    fn is_hardened(&self, store: &dyn Store) -> bool {
        self.expand()
            .iter()
            .map(|rule| rule.is_hardened(store))
            .fold(true, |all, hardened| all & hardened)
    }

    fn targets(&self) -> Vec<RuleTarget> {
        self.expand()
            .into_iter()
            .map(|rule| rule.target().clone())
            .collect()
    }
}
