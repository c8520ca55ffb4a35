/// A dense multi-channel cubic grid stored channel-major, then x, y, z (z fastest).
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    channels: usize,
    points: usize,
    data: Vec<f32>,
}

impl VoxelGrid {
    pub fn zeros(channels: usize, points: usize) -> Self {
        Self {
            channels,
            points,
            data: vec![0.0; channels * points * points * points],
        }
    }

    /// Wraps existing values, returning `None` when `data` does not hold exactly
    /// `channels * points^3` values.
    pub fn from_data(channels: usize, points: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == channels * points * points * points).then_some(Self {
            channels,
            points,
            data,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of grid points along each spatial axis.
    pub fn points(&self) -> usize {
        self.points
    }

    pub fn shape(&self) -> [usize; 4] {
        [self.channels, self.points, self.points, self.points]
    }

    pub fn channel_len(&self) -> usize {
        self.points * self.points * self.points
    }

    #[inline]
    pub fn index(&self, channel: usize, i: usize, j: usize, k: usize) -> usize {
        ((channel * self.points + i) * self.points + j) * self.points + k
    }

    #[inline]
    pub fn get(&self, channel: usize, i: usize, j: usize, k: usize) -> f32 {
        self.data[self.index(channel, i, j, k)]
    }

    pub fn channel(&self, channel: usize) -> &[f32] {
        let len = self.channel_len();
        &self.data[channel * len..(channel + 1) * len]
    }

    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        let len = self.channel_len();
        &mut self.data[channel * len..(channel + 1) * len]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Copies all channels of `other` into this grid starting at `channel_offset`.
    ///
    /// # Panics
    ///
    /// Panics if the spatial sizes differ or the channels do not fit.
    pub fn copy_channels_from(&mut self, other: &VoxelGrid, channel_offset: usize) {
        assert_eq!(self.points, other.points, "grid point counts differ");
        assert!(
            channel_offset + other.channels <= self.channels,
            "channels {}..{} exceed grid with {} channels",
            channel_offset,
            channel_offset + other.channels,
            self.channels
        );
        let start = channel_offset * self.channel_len();
        self.data[start..start + other.data.len()].copy_from_slice(&other.data);
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }

    pub fn l2_norm(&self) -> f64 {
        self.data
            .iter()
            .map(|&v| (v as f64) * (v as f64))
            .sum::<f64>()
            .sqrt()
    }
}
