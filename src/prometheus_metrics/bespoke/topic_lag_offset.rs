use const_format::formatcp;

use super::super::{LABEL_GROUP, LABEL_TOPIC, NAMESPACE};
use super::{HEADER_HELP, HEADER_TYPE, TYPE_GAUGE};

const NAME: &str = formatcp!("{NAMESPACE}_topic_lag_offset");
const HELP: &str =
    formatcp!("{HEADER_HELP} {NAME} The sum of the lag of the consumer group, over all the partitions of the topic. NOTE: '-1' means 'not calculated yet'.");
const TYPE: &str = formatcp!("{HEADER_TYPE} {NAME} {TYPE_GAUGE}");

pub(crate) fn append_headers(res: &mut Vec<String>) {
    res.push(HELP.into());
    res.push(TYPE.into());
}

pub(crate) fn append_metric(
    topic: &str,
    group: &str,
    total_lag: i64,
    calculated_at_utc_ms: i64,
    res: &mut Vec<String>,
) {
    res.push(format!(
        "{NAME}\
        {{\
            {LABEL_TOPIC}=\"{topic}\",\
            {LABEL_GROUP}=\"{group}\"\
        }} \
        {total_lag} \
        {calculated_at_utc_ms}"
    ));
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renders_headers_and_metric() {
        let mut res = Vec::new();
        append_headers(&mut res);
        append_metric("orders", "workers", 70, 1677706286068, &mut res);

        assert_eq!(res.len(), 3);
        assert!(res[0].starts_with("# HELP konsumer_lag_topic_lag_offset "));
        assert_eq!(res[1], "# TYPE konsumer_lag_topic_lag_offset gauge");
        assert_eq!(
            res[2],
            "konsumer_lag_topic_lag_offset{topic=\"orders\",group=\"workers\"} 70 1677706286068"
        );
    }
}
