use std::collections::HashMap;
use std::time::Duration;

use rdkafka::consumer::{BaseConsumer, Consumer, ConsumerContext};
use rdkafka::TopicPartitionList;

use super::errors::ClientResult;
use super::ConsumerHandle;
use crate::kafka_types::{CommittedOffset, TopicPartition, WatermarkOffsets};

impl<C> ConsumerHandle for BaseConsumer<C>
where
    C: ConsumerContext,
{
    fn current_assignment(&self) -> ClientResult<Vec<TopicPartition>> {
        Ok(self
            .assignment()?
            .elements()
            .iter()
            .map(|e| TopicPartition::new(e.topic().to_owned(), e.partition() as u32))
            .collect())
    }

    fn cached_watermarks(&self, tp: &TopicPartition) -> ClientResult<WatermarkOffsets> {
        Ok(self.get_watermark_offsets(&tp.topic, tp.partition as i32)?.into())
    }

    fn fetch_watermarks(
        &self,
        tp: &TopicPartition,
        timeout: Duration,
    ) -> ClientResult<WatermarkOffsets> {
        let watermarks = <Self as Consumer<C>>::fetch_watermarks(
            self,
            &tp.topic,
            tp.partition as i32,
            timeout,
        )?;

        Ok(watermarks.into())
    }

    fn committed_offsets(
        &self,
        tps: &[TopicPartition],
        timeout: Duration,
    ) -> ClientResult<HashMap<TopicPartition, CommittedOffset>> {
        let mut tpl = TopicPartitionList::with_capacity(tps.len());
        for tp in tps {
            tpl.add_partition(&tp.topic, tp.partition as i32);
        }

        Ok(<Self as Consumer<C>>::committed_offsets(self, tpl, timeout)?
            .elements()
            .iter()
            .map(|e| {
                (
                    TopicPartition::new(e.topic().to_owned(), e.partition() as u32),
                    CommittedOffset::from(e.offset()),
                )
            })
            .collect())
    }
}
