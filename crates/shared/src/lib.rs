use serde::{Deserialize, Serialize};

/// Unique identifier of an entity, group, light, or slide
pub type ObjectId = String;

fn default_true() -> bool {
    true
}

fn default_version() -> u32 {
    1
}

fn default_dim() -> f64 {
    1.0
}

fn default_radius() -> f64 {
    0.5
}

fn default_tube() -> f64 {
    0.2
}

fn default_radial_segments() -> u32 {
    16
}

fn default_height_segments() -> u32 {
    12
}

fn default_intensity() -> f64 {
    1.0
}

fn default_decay() -> f64 {
    2.0
}

fn default_angle() -> f64 {
    std::f64::consts::FRAC_PI_3
}

fn default_slide_duration() -> f64 {
    5.0
}

fn default_transition_duration() -> f64 {
    1.0
}

fn default_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn default_color() -> [f64; 3] {
    [0.8, 0.8, 0.8]
}

fn default_light_color() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn default_opacity() -> f64 {
    1.0
}

/// Parametric description of a generated geometry.
///
/// Every tag carries the minimal parameter set needed to regenerate the mesh
/// identically. Missing fields on load fall back to the per-tag defaults so
/// a legacy record never leaves an entity un-renderable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometryParamRecord {
    Box {
        #[serde(default = "default_dim")]
        width: f64,
        #[serde(default = "default_dim")]
        height: f64,
        #[serde(default = "default_dim")]
        depth: f64,
    },
    Sphere {
        #[serde(default = "default_radius")]
        radius: f64,
        #[serde(default = "default_radial_segments")]
        width_segments: u32,
        #[serde(default = "default_height_segments")]
        height_segments: u32,
    },
    Cylinder {
        #[serde(default = "default_radius")]
        radius_top: f64,
        #[serde(default = "default_radius")]
        radius_bottom: f64,
        #[serde(default = "default_dim")]
        height: f64,
        #[serde(default = "default_radial_segments")]
        radial_segments: u32,
    },
    Cone {
        #[serde(default = "default_radius")]
        radius: f64,
        #[serde(default = "default_dim")]
        height: f64,
        #[serde(default = "default_radial_segments")]
        radial_segments: u32,
    },
    Plane {
        #[serde(default = "default_dim")]
        width: f64,
        #[serde(default = "default_dim")]
        height: f64,
    },
    Torus {
        #[serde(default = "default_radius")]
        radius: f64,
        #[serde(default = "default_tube")]
        tube: f64,
        #[serde(default = "default_radial_segments")]
        radial_segments: u32,
        #[serde(default = "default_height_segments")]
        tubular_segments: u32,
    },
    /// Composite/outline shapes regenerated by a named shape generator.
    /// `Unknown` covers unrecognized legacy records; decode degrades those
    /// to a bounding-box stand-in using `vertex_count`/`bounding_box`.
    Custom {
        #[serde(default)]
        shape_type: ShapeType,
        #[serde(default = "default_dim")]
        size: f64,
        #[serde(default = "default_radius")]
        depth: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        vertex_count: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bounding_box: Option<BoundingBox>,
    },
    /// Externally imported mesh; regeneration is deferred to the asset
    /// loader collaborator.
    Imported {
        model_path: String,
        #[serde(default)]
        original_name: String,
        #[serde(default = "default_scale")]
        original_scale: [f64; 3],
    },
}

/// Named generator for `Custom` records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    Heart,
    Star,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Axis-aligned bounds stored with best-effort fallback records
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

/// Explicit vertex/index snapshot that supersedes parametric reconstruction
/// after free-form topology edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBufferOverride {
    /// Flat xyz positions, 3 floats per vertex
    pub positions: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Vec<u32>>,
}

/// Full geometry record: parametric tag plus optional raw-buffer override.
/// When the override is present it takes precedence on decode; the tag is
/// kept only as metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    #[serde(flatten)]
    pub params: GeometryParamRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_buffer: Option<RawBufferOverride>,
}

impl From<GeometryParamRecord> for GeometryRecord {
    fn from(params: GeometryParamRecord) -> Self {
        Self {
            params,
            raw_buffer: None,
        }
    }
}

/// Object transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub position: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default = "default_scale")]
    pub scale: [f64; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Surface material of an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    #[serde(default = "default_color")]
    pub color: [f64; 3],
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub metalness: f64,
    #[serde(default)]
    pub roughness: f64,
}

impl Default for MaterialRecord {
    fn default() -> Self {
        Self {
            color: default_color(),
            opacity: 1.0,
            metalness: 0.0,
            roughness: 0.0,
        }
    }
}

/// Optional wireframe overlay style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireframeStyle {
    #[serde(default)]
    pub color: [f64; 3],
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

/// Serialized scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    pub geometry: GeometryRecord,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub material: MaterialRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wireframe: Option<WireframeStyle>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<ObjectId>,
    /// Set when an imported model failed to load and a stand-in mesh was
    /// inserted instead; preserved across save so the object is not dropped.
    #[serde(default)]
    pub placeholder: bool,
}

/// Light kind; determines which fields are semantically active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    Directional,
    Point,
    Spot,
}

/// Serialized light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightRecord {
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LightKind,
    #[serde(default)]
    pub position: [f64; 3],
    /// Unused for point lights
    #[serde(default)]
    pub target: [f64; 3],
    #[serde(default = "default_intensity")]
    pub intensity: f64,
    #[serde(default = "default_light_color")]
    pub color: [f64; 3],
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub cast_shadow: bool,
    /// Point/spot range; 0 = unlimited
    #[serde(default)]
    pub distance: f64,
    #[serde(default = "default_decay")]
    pub decay: f64,
    /// Spot only
    #[serde(default = "default_angle")]
    pub angle: f64,
    /// Spot only
    #[serde(default)]
    pub penumbra: f64,
}

/// Serialized group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub expanded: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub object_ids: Vec<ObjectId>,
}

/// Annotation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Point,
    Text,
}

/// Slide annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: ObjectId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub position: [f64; 3],
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f64; 3]>,
}

/// Captured camera pose plus annotations, used for guided playback.
/// Slides reference scene state only by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideRecord {
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_slide_duration")]
    pub duration: f64,
    #[serde(default)]
    pub camera_position: [f64; 3],
    #[serde(default)]
    pub camera_target: [f64; 3],
    #[serde(default)]
    pub annotations: Vec<AnnotationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain_type: Option<String>,
}

/// Editor-wide settings carried in the bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSettings {
    #[serde(default = "default_color")]
    pub background_color: [f64; 3],
    #[serde(default = "default_true")]
    pub show_grid: bool,
    /// Seconds for slide playback camera transitions
    #[serde(default = "default_transition_duration")]
    pub slide_transition_duration: f64,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            background_color: default_color(),
            show_grid: true,
            slide_transition_duration: default_transition_duration(),
        }
    }
}

/// Complete serialized scene, as handed to the persistence collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SceneBundle {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
    #[serde(default)]
    pub lights: Vec<LightRecord>,
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
    #[serde(default)]
    pub settings: SceneSettings,
    #[serde(default)]
    pub slides: Vec<SlideRecord>,
}
