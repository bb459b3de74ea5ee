use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::ResolvedSize;
use crate::error::{ChartError, ChartResult};
use crate::render::{FailureReporter, RenderNode};

/// Raw chart options as supplied by the host.
pub type FormData = serde_json::Value;

/// Everything a renderer receives for one invocation.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub chart_type: String,
    /// Form data after the plugin transform (or untouched when there is none).
    pub props: FormData,
    pub size: ResolvedSize,
    /// Channel for failures of work the renderer completes after returning.
    pub failures: FailureReporter,
}

/// Draws a chart for the resolved size.
///
/// Returning `Err` or panicking both count as a render failure.
pub trait ChartRenderer {
    fn render(&self, request: &RenderRequest) -> ChartResult<RenderNode>;
}

impl<F> ChartRenderer for F
where
    F: Fn(&RenderRequest) -> ChartResult<RenderNode>,
{
    fn render(&self, request: &RenderRequest) -> ChartResult<RenderNode> {
        self(request)
    }
}

/// Maps raw form data into renderer props.
pub trait ChartTransform {
    fn transform(&self, form_data: &FormData) -> ChartResult<FormData>;
}

impl<F> ChartTransform for F
where
    F: Fn(&FormData) -> ChartResult<FormData>,
{
    fn transform(&self, form_data: &FormData) -> ChartResult<FormData> {
        self(form_data)
    }
}

/// Descriptive data shown by chart pickers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: SmallVec<[String; 4]>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub can_be_annotation_type: bool,
}

impl ChartMetadata {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|entry| entry == tag)
    }
}

/// Registry entry: a renderer, an optional transform and metadata under one key.
///
/// Descriptors are immutable once built; cloning shares the renderer and
/// transform.
#[derive(Clone)]
pub struct ChartPlugin {
    key: String,
    renderer: Rc<dyn ChartRenderer>,
    transform: Option<Rc<dyn ChartTransform>>,
    metadata: ChartMetadata,
}

impl ChartPlugin {
    #[must_use]
    pub fn builder(key: impl Into<String>) -> ChartPluginBuilder {
        ChartPluginBuilder {
            key: key.into(),
            renderer: None,
            transform: None,
            metadata: ChartMetadata::default(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn metadata(&self) -> &ChartMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn has_transform(&self) -> bool {
        self.transform.is_some()
    }

    /// Same renderer, transform and metadata under a different key.
    pub fn with_key(mut self, key: impl Into<String>) -> ChartResult<Self> {
        let key = key.into();
        validate_key(&key)?;
        self.key = key;
        Ok(self)
    }

    /// Applies the transform, or passes `form_data` through when there is none.
    pub fn transform(&self, form_data: &FormData) -> ChartResult<FormData> {
        match &self.transform {
            Some(transform) => transform.transform(form_data),
            None => Ok(form_data.clone()),
        }
    }

    pub fn render(&self, request: &RenderRequest) -> ChartResult<RenderNode> {
        self.renderer.render(request)
    }
}

impl fmt::Debug for ChartPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartPlugin")
            .field("key", &self.key)
            .field("has_transform", &self.transform.is_some())
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

pub struct ChartPluginBuilder {
    key: String,
    renderer: Option<Rc<dyn ChartRenderer>>,
    transform: Option<Rc<dyn ChartTransform>>,
    metadata: ChartMetadata,
}

impl ChartPluginBuilder {
    #[must_use]
    pub fn renderer(mut self, renderer: impl ChartRenderer + 'static) -> Self {
        self.renderer = Some(Rc::new(renderer));
        self
    }

    #[must_use]
    pub fn transform(mut self, transform: impl ChartTransform + 'static) -> Self {
        self.transform = Some(Rc::new(transform));
        self
    }

    #[must_use]
    pub fn metadata(mut self, metadata: ChartMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Validates the descriptor. An empty metadata name defaults to the key.
    pub fn build(self) -> ChartResult<ChartPlugin> {
        validate_key(&self.key)?;
        let Some(renderer) = self.renderer else {
            return Err(ChartError::InvalidPlugin(format!(
                "plugin `{}` has no renderer",
                self.key
            )));
        };

        let mut metadata = self.metadata;
        if metadata.name.trim().is_empty() {
            metadata.name = self.key.clone();
        }

        Ok(ChartPlugin {
            key: self.key,
            renderer,
            transform: self.transform,
            metadata,
        })
    }
}

impl fmt::Debug for ChartPluginBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartPluginBuilder")
            .field("key", &self.key)
            .field("has_renderer", &self.renderer.is_some())
            .field("has_transform", &self.transform.is_some())
            .finish_non_exhaustive()
    }
}

fn validate_key(key: &str) -> ChartResult<()> {
    if key.is_empty() {
        return Err(ChartError::InvalidPlugin(
            "plugin key must not be empty".to_owned(),
        ));
    }
    if key.trim() != key {
        return Err(ChartError::InvalidPlugin(format!(
            "plugin key `{key}` must not have surrounding whitespace"
        )));
    }
    Ok(())
}
