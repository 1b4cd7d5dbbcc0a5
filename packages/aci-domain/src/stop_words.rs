/// English stop words removed before TF-IDF vectorization. Sorted for binary search.
pub(crate) const ENGLISH_STOP_WORDS: &[&str] = &[
	"a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
	"alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
	"amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
	"anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
	"becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
	"besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
	"cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
	"done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
	"elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
	"everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
	"for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
	"get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here", "hereafter",
	"hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his", "how", "however",
	"hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its",
	"itself", "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
	"me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly", "move",
	"much", "must", "my", "myself", "name", "namely", "neither", "never", "nevertheless", "next",
	"nine", "no", "nobody", "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of",
	"off", "often", "on", "once", "one", "only", "onto", "or", "other", "others", "otherwise",
	"our", "ours", "ourselves", "out", "over", "own", "part", "per", "perhaps", "please", "put",
	"rather", "re", "same", "see", "seem", "seemed", "seeming", "seems", "serious", "several",
	"she", "should", "show", "side", "since", "sincere", "six", "sixty", "so", "some", "somehow",
	"someone", "something", "sometime", "sometimes", "somewhere", "still", "such", "system",
	"take", "ten", "than", "that", "the", "their", "them", "themselves", "then", "thence",
	"there", "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they",
	"thick", "thin", "third", "this", "those", "though", "three", "through", "throughout", "thru",
	"thus", "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
	"under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what",
	"whatever", "when", "whence", "whenever", "where", "whereafter", "whereas", "whereby",
	"wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who", "whoever",
	"whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet", "you",
	"your", "yours", "yourself", "yourselves",
];

/// Short function words skipped when picking retrieval keywords.
pub(crate) const KEYWORD_STOP_WORDS: &[&str] = &[
	"the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
	"one", "our", "out", "has", "him", "his", "how", "its", "may", "now", "see", "two", "who",
	"did", "she", "use", "way", "with", "have", "this", "that", "from", "they", "will", "been",
	"were", "said", "each", "which", "their", "would", "there", "what", "about", "into", "than",
	"them", "these", "some", "over", "also", "more", "very", "when", "your", "only", "just",
	"such", "like", "then", "could", "other", "most", "much", "many", "after", "before", "while",
	"where", "those", "being", "does", "doing", "here", "both", "same", "should", "under",
];

pub(crate) fn is_english_stop_word(token: &str) -> bool {
	ENGLISH_STOP_WORDS.binary_search(&token).is_ok()
}

pub(crate) fn is_keyword_stop_word(token: &str) -> bool {
	KEYWORD_STOP_WORDS.contains(&token)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn english_list_is_sorted_and_unique() {
		assert!(ENGLISH_STOP_WORDS.windows(2).all(|pair| pair[0] < pair[1]));
	}

	#[test]
	fn lookups_match_membership() {
		assert!(is_english_stop_word("the"));
		assert!(is_english_stop_word("third"));
		assert!(!is_english_stop_word("testimonials"));
		assert!(is_keyword_stop_word("over"));
		assert!(!is_keyword_stop_word("quick"));
	}
}
