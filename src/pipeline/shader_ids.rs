//! Shader property and global names bound by the pipeline

// Per-light properties
pub const LIGHT_AS_QUAD: &str = "_LightAsQuad";
pub const LIGHT_POS: &str = "_LightPos";
pub const LIGHT_DIR: &str = "_LightDir";
pub const LIGHT_COLOR: &str = "_LightColor";
pub const LIGHT_INDEX_FOR_SHADOW_MATRIX_ARRAY: &str = "_LightIndexForShadowMatrixArray";
pub const LIGHT_MATRIX0: &str = "_LightMatrix0";
pub const WORLD_TO_LIGHT: &str = "unity_WorldToLight";
pub const LIGHT_TEXTURE0: &str = "_LightTexture0";

// Reflection probe globals
pub const SPEC_CUBE0: &str = "unity_SpecCube0";
pub const SPEC_CUBE0_HDR: &str = "unity_SpecCube0_HDR";
pub const SPEC_CUBE0_BOX_MIN: &str = "unity_SpecCube0_BoxMin";
pub const SPEC_CUBE0_BOX_MAX: &str = "unity_SpecCube0_BoxMax";
pub const SPEC_CUBE0_PROBE_POSITION: &str = "unity_SpecCube0_ProbePosition";
pub const SPEC_CUBE1_PROBE_POSITION: &str = "unity_SpecCube1_ProbePosition";

// Shadow globals
pub const WORLD_TO_SHADOW: &str = "g_matWorldToShadow";
pub const DIR_SHADOW_SPLIT_SPHERES: &str = "g_vDirShadowSplitSpheres";
pub const SHADOW_PCF_TERMS: [&str; 4] = [
    "g_vShadow3x3PCFTerms0",
    "g_vShadow3x3PCFTerms1",
    "g_vShadow3x3PCFTerms2",
    "g_vShadow3x3PCFTerms3",
];
