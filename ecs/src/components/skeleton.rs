use crate::components::Transform;

/// Current pose of a skinned model.
///
/// Joint names are slash-separated paths from the skeleton root
/// (`"root/hip/knee"`). Each transform is relative to the joint's parent,
/// which is the joint whose name is the path without its last segment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkeletalPose {
    pub joint_names: Vec<String>,
    pub joint_transforms: Vec<Transform>,
}

impl SkeletalPose {
    pub fn new(joint_names: Vec<String>, joint_transforms: Vec<Transform>) -> Self {
        Self {
            joint_names,
            joint_transforms,
        }
    }

    /// Local transform of the joint with the given path.
    pub fn joint(&self, name: &str) -> Option<&Transform> {
        let index = self.joint_names.iter().position(|n| n == name)?;
        self.joint_transforms.get(index)
    }

    /// Iterates over `(name, local transform)` pairs.
    pub fn joints(&self) -> impl Iterator<Item = (&str, &Transform)> {
        self.joint_names
            .iter()
            .map(String::as_str)
            .zip(self.joint_transforms.iter())
    }
}

crate::component::impl_component!(SkeletalPose);
