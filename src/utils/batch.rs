//! 批处理工具
//!
//! 按固定大小顺序切分数据，并附带每批在原序列中的起始下标

/// 批处理器
#[derive(Debug, Clone, Copy)]
pub struct BatchProcessor {
    batch_size: usize,
}

impl BatchProcessor {
    /// 创建新的批处理器，批大小至少为 1
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 需要的批次数
    pub fn batch_count(&self, len: usize) -> usize {
        len.div_ceil(self.batch_size)
    }

    /// 返回 (起始下标, 批次切片)，保持原始顺序
    pub fn batches<'a, T>(&self, data: &'a [T]) -> impl Iterator<Item = (usize, &'a [T])> + 'a {
        let batch_size = self.batch_size;
        data.chunks(batch_size)
            .enumerate()
            .map(move |(i, chunk)| (i * batch_size, chunk))
    }

    /// 异步逐批处理，上一批完成后才开始下一批
    pub async fn process_in_batches_async<'a, T, R, F, Fut>(
        &self,
        data: &'a [T],
        mut processor: F,
    ) -> Vec<R>
    where
        F: FnMut(usize, &'a [T]) -> Fut,
        Fut: std::future::Future<Output = R>,
    {
        let mut results = Vec::with_capacity(self.batch_count(data.len()));

        for (start_index, chunk) in self.batches(data) {
            results.push(processor(start_index, chunk).await);
        }

        results
    }
}
