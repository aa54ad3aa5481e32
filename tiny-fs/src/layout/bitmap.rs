use alloc::vec;
use alloc::vec::Vec;

/// 位图，记录其指示区域内各项的分配情况
#[derive(Debug)]
pub struct Bitmap {
    /// 每组64位
    groups: Vec<u64>,
    /// 位图指示的总项数
    capacity: usize,
    /// 已分配项数
    used: usize,
}

/// 项编号
struct ItemID(u32);

impl Bitmap {
    pub fn new(capacity: usize) -> Self {
        Self {
            groups: vec![0; capacity.div_ceil(64)],
            capacity,
            used: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.capacity - self.used
    }

    /// 分配编号最小的空闲项。
    /// 若位图的空间用尽，则返回空。
    pub fn alloc(&mut self) -> Option<u32> {
        // 寻找组内还有0的位组
        let (group_index, ingroup_index) =
            self.groups
                .iter()
                .enumerate()
                .find_map(|(group_index, &bits)| {
                    (bits != u64::MAX).then_some((group_index, bits.trailing_ones() as usize))
                })?;

        let id = ItemID::encode(group_index, ingroup_index);
        // 末组中超出容量的位不可分配
        if id.0 as usize >= self.capacity {
            return None;
        }

        self.groups[group_index] |= 1 << ingroup_index;
        self.used += 1;
        Some(id.0)
    }

    /// 释放项，返回该项此前是否已分配
    pub fn dealloc(&mut self, id: u32) -> bool {
        if !self.is_allocated(id) {
            return false;
        }
        let (group_index, ingroup_index) = ItemID(id).decode();
        self.groups[group_index] &= !(1 << ingroup_index);
        self.used -= 1;
        true
    }

    pub fn is_allocated(&self, id: u32) -> bool {
        if id as usize >= self.capacity {
            return false;
        }
        let (group_index, ingroup_index) = ItemID(id).decode();
        self.groups[group_index] & (1 << ingroup_index) != 0
    }
}

impl ItemID {
    #[inline]
    fn encode(group_index: usize, ingroup_index: usize) -> Self {
        Self((group_index * 64 + ingroup_index) as u32)
    }

    #[inline]
    fn decode(self) -> (usize, usize) {
        let id = self.0 as usize;
        (id / 64, id % 64)
    }
}
