use const_format::formatcp;

use super::super::{LABEL_GROUP, LABEL_TOPIC, NAMESPACE};
use super::{HEADER_HELP, HEADER_TYPE, TYPE_GAUGE};

const NAME: &str = formatcp!("{NAMESPACE}_topic_partitions");
const HELP: &str =
    formatcp!("{HEADER_HELP} {NAME} Partitions of the topic the lag was calculated over. NOTE: '0' means 'unknown'.");
const TYPE: &str = formatcp!("{HEADER_TYPE} {NAME} {TYPE_GAUGE}");

pub(crate) fn append_headers(res: &mut Vec<String>) {
    res.push(HELP.into());
    res.push(TYPE.into());
}

pub(crate) fn append_metric(
    topic: &str,
    group: &str,
    partition_count: usize,
    calculated_at_utc_ms: i64,
    res: &mut Vec<String>,
) {
    res.push(format!(
        "{NAME}\
        {{\
            {LABEL_TOPIC}=\"{topic}\",\
            {LABEL_GROUP}=\"{group}\"\
        }} \
        {partition_count} \
        {calculated_at_utc_ms}"
    ));
}
