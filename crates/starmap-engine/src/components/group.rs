/// Scene group — each object belongs to exactly one.
///
/// Groups are drawn in declaration order: the background starfield first,
/// the focused system last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SceneGroup {
    Starfield = 0,
    Stars = 1,
    Planets = 2,
    Focus = 3,
}

impl SceneGroup {
    /// Total number of groups.
    pub const COUNT: usize = 4;

    pub const ALL: [SceneGroup; Self::COUNT] = [
        SceneGroup::Starfield,
        SceneGroup::Stars,
        SceneGroup::Planets,
        SceneGroup::Focus,
    ];

    /// Convert from a u8 value. Returns None if out of range.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Starfield),
            1 => Some(Self::Stars),
            2 => Some(Self::Planets),
            3 => Some(Self::Focus),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_index_order() {
        for (i, group) in SceneGroup::ALL.iter().enumerate() {
            assert_eq!(group.index(), i);
            assert_eq!(SceneGroup::from_u8(i as u8), Some(*group));
        }
        assert!(SceneGroup::from_u8(4).is_none());
    }
}
